use geojson::JsonObject;
use serde::Deserialize;
use serde_json::Value;

use crate::geomap::{FilterSet, Line, ObjectType, Symbol, Text};

use super::key::{GeometryKind, GroupDefaults, GroupKey};

pub const MAP_OBJECT_TYPE_PROPERTY: &str = "E2G_MapObjectType";
pub const MAP_GROUP_ID_PROPERTY: &str = "E2G_MapGroupId";
pub const LINE_OBJECT_ID_PROPERTY: &str = "E2G_LineObjectId";
pub const SYMBOL_ID_PROPERTY: &str = "E2G_SymbolId";
/// Carries the text of displayed text records.
pub const TEXT_PROPERTY: &str = "text";
/// Carries the text of records whose display setting is off, so renderers skip them.
pub const HIDDEN_TEXT_PROPERTY: &str = "E2G_text";

/// How features of one geomap are partitioned into output collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupingStrategy {
    /// One collection per exact filter set and geometry kind.
    #[default]
    Filters,
    /// One collection per rendering attribute signature and geometry kind.
    Attributes,
    /// One collection per geomap with every attribute on every feature.
    Raw,
}

/// A resolved record together with the object type it belongs to.
#[derive(Debug, Clone, Copy)]
pub enum RecordRef<'a> {
    Line {
        object_type: &'a ObjectType,
        line: &'a Line,
    },
    Symbol {
        object_type: &'a ObjectType,
        symbol: &'a Symbol,
    },
    Text {
        object_type: &'a ObjectType,
        symbol: &'a Symbol,
        text: &'a Text,
    },
}

impl<'a> RecordRef<'a> {
    pub fn kind(&self) -> GeometryKind {
        match self {
            RecordRef::Line { .. } => GeometryKind::Lines,
            RecordRef::Symbol { .. } => GeometryKind::Symbols,
            RecordRef::Text { .. } => GeometryKind::Text,
        }
    }

    pub fn filters(&self) -> &'a FilterSet {
        match *self {
            RecordRef::Line { line, .. } => &line.applied.filters,
            RecordRef::Symbol { symbol, .. } => &symbol.applied.filters,
            RecordRef::Text { text, .. } => &text.applied.filters,
        }
    }

    fn object_type(&self) -> &'a ObjectType {
        match *self {
            RecordRef::Line { object_type, .. }
            | RecordRef::Symbol { object_type, .. }
            | RecordRef::Text { object_type, .. } => object_type,
        }
    }
}

fn optional_number<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn optional_two_digit(value: Option<u32>) -> String {
    value.map(|v| format!("{:02}", v)).unwrap_or_default()
}

/// Leading part shared by every signature: brightness group, filters, object type and group.
fn signature_prefix(record: &RecordRef, bcg_group: Option<u32>) -> String {
    let object_type = record.object_type();
    format!(
        "BCG {}_Filters {}_Type {}_Group {}",
        optional_two_digit(bcg_group),
        record.filters(),
        object_type.map_object_type,
        object_type.map_group_id
    )
}

/// Attribute signature naming a record's group, e.g.
/// `BCG 05_Filters 01 02_Type Coast_Group 1_Object L1_Style Solid_Thick 1`.
pub fn attribute_signature(record: &RecordRef) -> String {
    match record {
        RecordRef::Line { line, .. } => format!(
            "{}_Object {}_Style {}_Thick {}",
            signature_prefix(record, line.applied.bcg_group),
            line.id,
            line.applied.style.as_deref().unwrap_or_default(),
            optional_number(line.applied.thickness)
        ),
        RecordRef::Symbol { symbol, .. } => format!(
            "{}_Style {}_Font {}",
            signature_prefix(record, symbol.applied.bcg_group),
            symbol.applied.style.as_deref().unwrap_or_default(),
            optional_number(symbol.applied.font_size)
        ),
        RecordRef::Text { text, .. } => format!(
            "{}_Font {}_Underline {}_X {}_Y {}",
            signature_prefix(record, text.applied.bcg_group),
            optional_number(text.applied.font_size),
            if text.applied.underline { "T" } else { "F" },
            optional_number(text.applied.x_offset),
            optional_number(text.applied.y_offset)
        ),
    }
}

/// Values a record's attribute signature is rendered from.
fn signature_defaults(record: &RecordRef) -> GroupDefaults {
    let filters = record.filters().to_vec();
    match record {
        RecordRef::Line { line, .. } => GroupDefaults {
            bcg_group: line.applied.bcg_group,
            filters,
            style: line.applied.style.clone(),
            thickness: line.applied.thickness,
            ..Default::default()
        },
        RecordRef::Symbol { symbol, .. } => GroupDefaults {
            bcg_group: symbol.applied.bcg_group,
            filters,
            style: symbol.applied.style.clone(),
            font_size: symbol.applied.font_size,
            ..Default::default()
        },
        RecordRef::Text { text, .. } => GroupDefaults {
            bcg_group: text.applied.bcg_group,
            filters,
            font_size: text.applied.font_size,
            underline: Some(text.applied.underline),
            x_offset: text.applied.x_offset,
            y_offset: text.applied.y_offset,
            ..Default::default()
        },
    }
}

/// Absent values are written as `null`.
fn insert_optional<T: Into<Value>>(properties: &mut JsonObject, key: &str, value: Option<T>) {
    properties.insert(key.to_string(), value.map_or(Value::Null, Into::into));
}

fn custom_properties(record: &RecordRef) -> JsonObject {
    let object_type = record.object_type();
    let mut properties = JsonObject::new();
    properties.insert(
        MAP_OBJECT_TYPE_PROPERTY.to_string(),
        Value::from(object_type.map_object_type.clone()),
    );
    properties.insert(
        MAP_GROUP_ID_PROPERTY.to_string(),
        Value::from(object_type.map_group_id.clone()),
    );
    match record {
        RecordRef::Line { line, .. } => {
            properties.insert(LINE_OBJECT_ID_PROPERTY.to_string(), Value::from(line.id.clone()));
        }
        RecordRef::Symbol { symbol, .. } | RecordRef::Text { symbol, .. } => {
            properties.insert(SYMBOL_ID_PROPERTY.to_string(), Value::from(symbol.id.clone()));
        }
    }
    properties
}

/// Lines of a text record, stored under `text` or, when hidden, `E2G_text`.
pub fn text_property(text: &Text) -> (&'static str, Value) {
    let key = if text.applied.display {
        TEXT_PROPERTY
    } else {
        HIDDEN_TEXT_PROPERTY
    };
    (key, Value::from(text.lines.clone()))
}

/// Every applied attribute of a record, as carried by raw output.
fn defining_properties(record: &RecordRef) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert(
        "filters".to_string(),
        Value::from(record.filters().to_vec()),
    );
    match record {
        RecordRef::Line { line, .. } => {
            let applied = &line.applied;
            insert_optional(&mut properties, "bcg", applied.bcg_group);
            insert_optional(&mut properties, "style", applied.style.clone());
            insert_optional(&mut properties, "thickness", applied.thickness);
        }
        RecordRef::Symbol { symbol, .. } => {
            let applied = &symbol.applied;
            insert_optional(&mut properties, "bcg", applied.bcg_group);
            insert_optional(&mut properties, "style", applied.style.clone());
            insert_optional(&mut properties, "size", applied.font_size);
        }
        RecordRef::Text { text, .. } => {
            let applied = &text.applied;
            insert_optional(&mut properties, "bcg", applied.bcg_group);
            insert_optional(&mut properties, "size", applied.font_size);
            properties.insert("underline".to_string(), Value::from(applied.underline));
            insert_optional(&mut properties, "xOffset", applied.x_offset);
            insert_optional(&mut properties, "yOffset", applied.y_offset);
            let (key, value) = text_property(text);
            properties.insert(key.to_string(), value);
        }
    }
    properties
}

impl GroupingStrategy {
    pub fn key_for(&self, record: &RecordRef) -> GroupKey {
        match self {
            GroupingStrategy::Filters => GroupKey::Filter {
                filters: record.filters().clone(),
                kind: record.kind(),
            },
            GroupingStrategy::Attributes => GroupKey::Signature {
                signature: attribute_signature(record),
                kind: record.kind(),
                defaults: signature_defaults(record),
            },
            GroupingStrategy::Raw => GroupKey::Raw,
        }
    }

    /// Whether line segments of a group are chained into polylines.
    pub fn merges_lines(&self) -> bool {
        !matches!(self, GroupingStrategy::Raw)
    }

    /// Properties of the feature produced for a record.
    ///
    /// Grouped output leaves the rendering attributes to the group's default marker, so lines and
    /// symbols only carry custom properties and text adds its content. Raw output carries
    /// everything.
    pub fn properties_for(&self, record: &RecordRef, include_custom: bool) -> Option<JsonObject> {
        let mut properties = match (self, record) {
            (GroupingStrategy::Raw, _) => defining_properties(record),
            (_, RecordRef::Text { text, .. }) => {
                let (key, value) = text_property(text);
                let mut properties = JsonObject::new();
                properties.insert(key.to_string(), value);
                properties
            }
            _ => JsonObject::new(),
        };
        if include_custom {
            properties.extend(custom_properties(record));
        }
        if properties.is_empty() {
            None
        } else {
            Some(properties)
        }
    }
}
