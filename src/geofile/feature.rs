use geojson::JsonObject;

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: geo::Geometry,
    pub properties: Option<JsonObject>,
}

impl Feature {
    pub fn new(geometry: geo::Geometry, properties: Option<JsonObject>) -> Self {
        Self {
            geometry,
            properties,
        }
    }
}

impl From<geo::Geometry> for Feature {
    fn from(value: geo::Geometry) -> Self {
        Self {
            geometry: value,
            properties: None,
        }
    }
}
