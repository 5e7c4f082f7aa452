use rayon::prelude::*;
use thiserror::Error;

use crate::assemble::{FeatureAssembler, GeomapOutput};
use crate::geomap::{resolve_geomap, InvalidRecordPolicy, RawGeomap, ResolveError};
use crate::grouping::GroupingStrategy;

#[derive(Error, Debug)]
#[error("geomap '{geomap_id}' could not be converted")]
pub struct ConvertError {
    pub geomap_id: String,
    #[source]
    pub source: ResolveError,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub strategy: GroupingStrategy,
    pub include_custom_properties: bool,
    pub invalid_records: InvalidRecordPolicy,
}

pub fn convert_geomap(
    raw: &RawGeomap,
    options: &ConvertOptions,
) -> Result<GeomapOutput, ConvertError> {
    let geomap = resolve_geomap(raw, options.invalid_records).map_err(|source| ConvertError {
        geomap_id: raw.header.geomap_id.clone(),
        source,
    })?;
    let output = FeatureAssembler::new(options.strategy, options.include_custom_properties)
        .assemble(&geomap);
    log::debug!(
        "Geomap {}: {} lines, {} symbols into {} groups",
        geomap.header.geomap_id,
        geomap.line_count(),
        geomap.symbol_count(),
        output.groups.len()
    );
    Ok(output)
}

/// Resolve and assemble every geomap in parallel. Outputs keep the input order.
pub fn convert_geomaps(
    raws: &[RawGeomap],
    options: &ConvertOptions,
) -> Result<Vec<GeomapOutput>, ConvertError> {
    raws.par_iter()
        .map(|raw| convert_geomap(raw, options))
        .collect()
}
