use serde::Deserialize;
use thiserror::Error;

use crate::coord::{position_from_dms, CoordinateError};

use super::model::{
    AppliedLine, AppliedSymbol, AppliedText, FilterSet, Geomap, Line, LineAttributes, ObjectType,
    RawGeomap, RawLine, RawObjectType, RawSymbol, RawText, Symbol, SymbolAttributes, Text,
    TextAttributes,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("{record} in object type '{object_type}' is missing required field {field}")]
    MissingRequiredField {
        record: &'static str,
        field: &'static str,
        object_type: String,
    },
    #[error("{record} '{id}' has an invalid coordinate")]
    Coordinate {
        record: &'static str,
        id: String,
        #[source]
        source: CoordinateError,
    },
}

/// What to do with a record that fails to resolve.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRecordPolicy {
    /// Fail the whole geomap.
    #[default]
    Abort,
    /// Log the record and leave it out.
    Skip,
}

/// Override if present, otherwise the default. An override of any length replaces the default
/// filters entirely.
fn resolve_filters(overrides: &[u32], defaults: &[u32]) -> FilterSet {
    if overrides.is_empty() {
        FilterSet::new(defaults.iter().copied())
    } else {
        FilterSet::new(overrides.iter().copied())
    }
}

fn pick<T: Clone>(overriding: &Option<T>, default: &Option<T>) -> Option<T> {
    overriding.as_ref().or(default.as_ref()).cloned()
}

impl LineAttributes {
    pub fn resolve(&self, defaults: &LineAttributes) -> AppliedLine {
        AppliedLine {
            filters: resolve_filters(&self.filters, &defaults.filters),
            bcg_group: pick(&self.bcg_group, &defaults.bcg_group),
            style: pick(&self.style, &defaults.style),
            thickness: pick(&self.thickness, &defaults.thickness),
        }
    }
}

impl SymbolAttributes {
    pub fn resolve(&self, defaults: &SymbolAttributes) -> AppliedSymbol {
        AppliedSymbol {
            filters: resolve_filters(&self.filters, &defaults.filters),
            bcg_group: pick(&self.bcg_group, &defaults.bcg_group),
            style: pick(&self.style, &defaults.style),
            font_size: pick(&self.font_size, &defaults.font_size),
        }
    }
}

impl TextAttributes {
    pub fn resolve(&self, defaults: &TextAttributes) -> AppliedText {
        AppliedText {
            filters: resolve_filters(&self.filters, &defaults.filters),
            bcg_group: pick(&self.bcg_group, &defaults.bcg_group),
            font_size: pick(&self.font_size, &defaults.font_size),
            underline: pick(&self.underline, &defaults.underline).unwrap_or(false),
            display: pick(&self.display, &defaults.display).unwrap_or(false),
            x_offset: pick(&self.x_offset, &defaults.x_offset),
            y_offset: pick(&self.y_offset, &defaults.y_offset),
        }
    }
}

fn required<'a>(
    value: &'a Option<String>,
    record: &'static str,
    field: &'static str,
    object_type: &RawObjectType,
) -> Result<&'a str, ResolveError> {
    value
        .as_deref()
        .ok_or_else(|| ResolveError::MissingRequiredField {
            record,
            field,
            object_type: object_type.map_object_type.clone(),
        })
}

pub fn resolve_line(raw: &RawLine, object_type: &RawObjectType) -> Result<Line, ResolveError> {
    const RECORD: &str = "GeoMapLine";
    let id = required(&raw.id, RECORD, "LineObjectId", object_type)?;
    let start_latitude = required(&raw.start_latitude, RECORD, "StartLatitude", object_type)?;
    let start_longitude = required(&raw.start_longitude, RECORD, "StartLongitude", object_type)?;
    let end_latitude = required(&raw.end_latitude, RECORD, "EndLatitude", object_type)?;
    let end_longitude = required(&raw.end_longitude, RECORD, "EndLongitude", object_type)?;

    let coordinate_error = |source| ResolveError::Coordinate {
        record: RECORD,
        id: id.to_string(),
        source,
    };
    Ok(Line {
        id: id.to_string(),
        start: position_from_dms(start_latitude, start_longitude).map_err(coordinate_error)?,
        end: position_from_dms(end_latitude, end_longitude).map_err(coordinate_error)?,
        applied: raw.overrides.resolve(&object_type.line_defaults),
    })
}

fn resolve_text(raw: &RawText, object_type: &RawObjectType) -> Text {
    Text {
        lines: raw.lines.clone(),
        applied: raw.overrides.resolve(&object_type.text_defaults),
    }
}

pub fn resolve_symbol(
    raw: &RawSymbol,
    object_type: &RawObjectType,
) -> Result<Symbol, ResolveError> {
    const RECORD: &str = "GeoMapSymbol";
    let id = required(&raw.id, RECORD, "SymbolId", object_type)?;
    let latitude = required(&raw.latitude, RECORD, "Latitude", object_type)?;
    let longitude = required(&raw.longitude, RECORD, "Longitude", object_type)?;

    let position =
        position_from_dms(latitude, longitude).map_err(|source| ResolveError::Coordinate {
            record: RECORD,
            id: id.to_string(),
            source,
        })?;
    Ok(Symbol {
        id: id.to_string(),
        position,
        applied: raw.overrides.resolve(&object_type.symbol_defaults),
        texts: raw
            .texts
            .iter()
            .map(|text| resolve_text(text, object_type))
            .collect(),
    })
}

fn keep_or_skip<T>(
    result: Result<T, ResolveError>,
    policy: InvalidRecordPolicy,
    geomap_id: &str,
) -> Result<Option<T>, ResolveError> {
    match (result, policy) {
        (Ok(record), _) => Ok(Some(record)),
        (Err(err), InvalidRecordPolicy::Skip) => {
            log::warn!("Skipping record in geomap {}: {}", geomap_id, error_chain(&err));
            Ok(None)
        }
        (Err(err), InvalidRecordPolicy::Abort) => Err(err),
    }
}

/// Render an error followed by its sources, e.g. "line 'L1' has an invalid coordinate: ...".
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn resolve_object_type(
    raw: &RawObjectType,
    policy: InvalidRecordPolicy,
    geomap_id: &str,
) -> Result<ObjectType, ResolveError> {
    let mut lines = Vec::with_capacity(raw.lines.len());
    for line in &raw.lines {
        if let Some(line) = keep_or_skip(resolve_line(line, raw), policy, geomap_id)? {
            lines.push(line);
        }
    }
    let mut symbols = Vec::with_capacity(raw.symbols.len());
    for symbol in &raw.symbols {
        if let Some(symbol) = keep_or_skip(resolve_symbol(symbol, raw), policy, geomap_id)? {
            symbols.push(symbol);
        }
    }
    Ok(ObjectType {
        map_object_type: raw.map_object_type.clone(),
        map_group_id: raw.map_group_id.clone(),
        lines,
        symbols,
    })
}

/// Resolve every record of a geomap: applied attributes from override, then object type
/// default, then fallback; coordinates converted to decimal degrees.
pub fn resolve_geomap(
    raw: &RawGeomap,
    policy: InvalidRecordPolicy,
) -> Result<Geomap, ResolveError> {
    let object_types = raw
        .object_types
        .iter()
        .map(|object_type| resolve_object_type(object_type, policy, &raw.header.geomap_id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Geomap {
        header: raw.header.clone(),
        object_types,
    })
}
