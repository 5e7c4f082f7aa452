use std::collections::BTreeMap;

use geojson::JsonObject;

use crate::geofile::feature::Feature;
use crate::geomap::{Geomap, GeomapHeader};
use crate::grouping::{GroupKey, GroupingStrategy, RecordRef};
use crate::polyline::PolylineMerger;

use super::marker::defaults_marker;

/// Output collections of one geomap, keyed by group.
#[derive(Debug, Clone, PartialEq)]
pub struct GeomapOutput {
    pub header: GeomapHeader,
    pub groups: BTreeMap<GroupKey, Vec<Feature>>,
}

impl GeomapOutput {
    pub fn feature_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

#[derive(Default)]
struct GroupAccumulator {
    merger: PolylineMerger,
    /// Properties of the group's first line, carried by the merged polyline feature.
    line_properties: Option<JsonObject>,
    features: Vec<Feature>,
}

impl GroupAccumulator {
    fn into_features(self, key: &GroupKey) -> Vec<Feature> {
        let mut features = Vec::with_capacity(self.features.len() + 2);
        features.extend(defaults_marker(key));
        if !self.merger.is_empty() {
            let polylines = geo::MultiLineString::new(self.merger.finish());
            features.push(Feature::new(
                geo::Geometry::MultiLineString(polylines),
                self.line_properties,
            ));
        }
        features.extend(self.features);
        features
    }
}

/// Turns resolved geomaps into grouped feature collections.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssembler {
    strategy: GroupingStrategy,
    include_custom_properties: bool,
}

impl FeatureAssembler {
    pub fn new(strategy: GroupingStrategy, include_custom_properties: bool) -> Self {
        Self {
            strategy,
            include_custom_properties,
        }
    }

    fn add(&self, groups: &mut BTreeMap<GroupKey, GroupAccumulator>, record: RecordRef) {
        let group = groups.entry(self.strategy.key_for(&record)).or_default();
        match record {
            RecordRef::Line { line, .. } if self.strategy.merges_lines() => {
                if group.merger.is_empty() {
                    group.line_properties = self
                        .strategy
                        .properties_for(&record, self.include_custom_properties);
                }
                group.merger.push(line.start, line.end);
            }
            RecordRef::Line { line, .. } => group.features.push(Feature::new(
                geo::Geometry::LineString(geo::LineString::new(vec![line.start, line.end])),
                self.strategy
                    .properties_for(&record, self.include_custom_properties),
            )),
            RecordRef::Symbol { symbol, .. } | RecordRef::Text { symbol, .. } => {
                group.features.push(Feature::new(
                    geo::Geometry::Point(geo::Point::from(symbol.position)),
                    self.strategy
                        .properties_for(&record, self.include_custom_properties),
                ))
            }
        }
    }

    /// Assemble the collections of one geomap.
    ///
    /// Records are visited per object type in document order: lines, then symbols, then the text
    /// of each symbol. Line groups come out as a default marker followed by a single
    /// MultiLineString of the merged polylines; symbol and text groups as the marker followed by
    /// one point per record. Only groups that received a record are returned.
    ///
    /// A by-filter line group spans every object type sharing its filter set, yet its single
    /// MultiLineString carries the custom properties (`E2G_MapObjectType`, `E2G_MapGroupId`,
    /// `E2G_LineObjectId`) of the group's first line only. Attribute-signature groups are keyed
    /// by object type, group and line object, so their metadata always matches every line.
    pub fn assemble(&self, geomap: &Geomap) -> GeomapOutput {
        let mut groups: BTreeMap<GroupKey, GroupAccumulator> = BTreeMap::new();
        for object_type in &geomap.object_types {
            for line in &object_type.lines {
                self.add(&mut groups, RecordRef::Line { object_type, line });
            }
            for symbol in &object_type.symbols {
                self.add(&mut groups, RecordRef::Symbol { object_type, symbol });
            }
            for symbol in &object_type.symbols {
                for text in &symbol.texts {
                    self.add(
                        &mut groups,
                        RecordRef::Text {
                            object_type,
                            symbol,
                            text,
                        },
                    );
                }
            }
        }

        let groups = groups
            .into_iter()
            .map(|(key, group)| {
                let features = group.into_features(&key);
                (key, features)
            })
            .collect();
        GeomapOutput {
            header: geomap.header.clone(),
            groups,
        }
    }
}
