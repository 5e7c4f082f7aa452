use std::{fs, io, path::Path};

use super::feature::Feature;

impl From<&Feature> for geojson::Feature {
    fn from(feature: &Feature) -> Self {
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(
                &feature.geometry,
            ))),
            id: None,
            properties: feature.properties.clone(),
            foreign_members: None,
        }
    }
}

/// Wrap features in a single FeatureCollection, keeping their order.
pub fn features_to_geojson(features: &[Feature]) -> geojson::GeoJson {
    let feature_collection: geojson::FeatureCollection =
        features.iter().map(geojson::Feature::from).collect();
    geojson::GeoJson::from(feature_collection)
}

pub fn write_features_to_geojson(features: &[Feature], output_filepath: &Path) -> io::Result<()> {
    fs::write(output_filepath, features_to_geojson(features).to_string())
}
