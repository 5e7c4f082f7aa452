pub mod menus;
pub mod model;
pub mod resolve;
pub mod xml;

pub use menus::MenuIndex;
pub use model::{
    AppliedLine, AppliedSymbol, AppliedText, FilterSet, Geomap, GeomapHeader, Line, ObjectType,
    RawGeomap, Symbol, Text,
};
pub use resolve::{resolve_geomap, InvalidRecordPolicy, ResolveError};
pub use xml::{parse_geomaps, read_geomaps_file, IngestError};
