use geojson::JsonObject;
use serde_json::Value;

use crate::geofile::feature::Feature;
use crate::grouping::{GeometryKind, GroupDefaults, GroupKey};

/// Position of the default marker, (lon, lat). Off in a corner of the world so it never renders
/// on a real map.
pub const MARKER_POSITION: (f64, f64) = (180.0, 90.0);

fn insert_present<T: Into<Value>>(properties: &mut JsonObject, key: &str, value: Option<T>) {
    if let Some(value) = value {
        properties.insert(key.to_string(), value.into());
    }
}

/// Rendering attributes of a signature group as marker properties. Absent values are left out.
fn defaults_properties(defaults: &GroupDefaults) -> JsonObject {
    let mut properties = JsonObject::new();
    insert_present(&mut properties, "bcg", defaults.bcg_group);
    properties.insert("filters".to_string(), Value::from(defaults.filters.clone()));
    insert_present(
        &mut properties,
        "style",
        defaults.style.clone().filter(|style| !style.is_empty()),
    );
    insert_present(&mut properties, "thickness", defaults.thickness);
    insert_present(&mut properties, "size", defaults.font_size);
    insert_present(&mut properties, "underline", defaults.underline);
    insert_present(&mut properties, "xOffset", defaults.x_offset);
    insert_present(&mut properties, "yOffset", defaults.y_offset);
    properties
}

/// Placeholder point carrying a group's shared rendering defaults. Raw groups have none.
pub fn defaults_marker(key: &GroupKey) -> Option<Feature> {
    let kind = key.kind()?;
    let mut properties = JsonObject::new();
    properties.insert(kind.defaults_property().to_string(), Value::from(true));
    if let GroupKey::Signature { defaults, .. } = key {
        properties.extend(defaults_properties(defaults));
    }
    if kind == GeometryKind::Text {
        properties.insert("opaque".to_string(), Value::from(false));
    }
    let (x, y) = MARKER_POSITION;
    Some(Feature::new(
        geo::Geometry::Point(geo::Point::new(x, y)),
        Some(properties),
    ))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::geomap::{AppliedLine, FilterSet, Line, ObjectType};
    use crate::grouping::{GeometryKind, GroupDefaults, GroupKey, GroupingStrategy, RecordRef};

    use super::defaults_marker;

    #[rstest]
    fn test_line_signature_marker() {
        let marker = defaults_marker(&GroupKey::Signature {
            signature: "BCG 05_Filters 01 02_Type Coast_Group 1_Object L1_Style Solid_Thick 2"
                .to_string(),
            kind: GeometryKind::Lines,
            defaults: GroupDefaults {
                bcg_group: Some(5),
                filters: vec![1, 2],
                style: Some("Solid".to_string()),
                thickness: Some(2),
                ..Default::default()
            },
        })
        .unwrap();
        let properties = marker.properties.unwrap();
        assert_eq!(properties["isLineDefaults"], json!(true));
        assert_eq!(properties["bcg"], json!(5));
        assert_eq!(properties["filters"], json!([1, 2]));
        assert_eq!(properties["style"], json!("Solid"));
        assert_eq!(properties["thickness"], json!(2));
        assert_eq!(properties.len(), 5);
    }

    #[rstest]
    fn test_underscores_in_free_text_survive() {
        let object_type = ObjectType {
            map_object_type: "Low_Airway".to_string(),
            map_group_id: "G_1".to_string(),
            lines: vec![Line {
                id: "J_X 5".to_string(),
                start: geo::Coord { x: 0.0, y: 0.0 },
                end: geo::Coord { x: 1.0, y: 1.0 },
                applied: AppliedLine {
                    filters: FilterSet::new([3]),
                    bcg_group: None,
                    style: Some("Short_Dashed".to_string()),
                    thickness: Some(1),
                },
            }],
            symbols: vec![],
        };
        let record = RecordRef::Line {
            object_type: &object_type,
            line: &object_type.lines[0],
        };
        let key = GroupingStrategy::Attributes.key_for(&record);

        let properties = defaults_marker(&key).unwrap().properties.unwrap();
        assert_eq!(properties["style"], json!("Short_Dashed"));
        assert_eq!(properties["thickness"], json!(1));
        assert!(!properties.contains_key("xOffset"));
        assert!(!properties.contains_key("bcg"));
    }

    #[rstest]
    #[case(GeometryKind::Lines, "isLineDefaults")]
    #[case(GeometryKind::Symbols, "isSymbolDefaults")]
    fn test_filter_marker(#[case] kind: GeometryKind, #[case] flag: &str) {
        let marker = defaults_marker(&GroupKey::Filter {
            filters: FilterSet::new([5]),
            kind,
        })
        .unwrap();
        assert_eq!(
            marker.geometry,
            geo::Geometry::Point(geo::Point::new(180.0, 90.0))
        );
        let properties = marker.properties.unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[flag], json!(true));
    }

    #[rstest]
    fn test_text_marker_is_not_opaque() {
        let marker = defaults_marker(&GroupKey::Signature {
            signature: "BCG 02_Filters 01_Type A_Group 1_Font 3_Underline F_X 0_Y _Text".to_string(),
            kind: GeometryKind::Text,
            defaults: GroupDefaults {
                bcg_group: Some(2),
                filters: vec![1],
                font_size: Some(3),
                underline: Some(false),
                x_offset: Some(0),
                ..Default::default()
            },
        })
        .unwrap();
        let properties = marker.properties.unwrap();
        assert_eq!(properties["isTextDefaults"], json!(true));
        assert_eq!(properties["opaque"], json!(false));
        assert_eq!(properties["bcg"], json!(2));
        assert_eq!(properties["size"], json!(3));
        assert_eq!(properties["underline"], json!(false));
        assert_eq!(properties["xOffset"], json!(0));
        assert!(!properties.contains_key("yOffset"));
    }

    #[rstest]
    fn test_raw_has_no_marker() {
        assert_eq!(defaults_marker(&GroupKey::Raw), None);
    }
}
