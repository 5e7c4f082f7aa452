use std::collections::BTreeSet;
use std::fmt;

/// Filter group meaning "always display". Substituted whenever a record resolves to no filters.
pub const ALWAYS_VISIBLE_FILTER: u32 = 0;

/// Identification and menu membership of one geomap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeomapHeader {
    pub geomap_id: String,
    pub bcg_menu_name: String,
    pub filter_menu_name: String,
    pub label_line1: String,
    pub label_line2: String,
}

/// Overridable line attributes. Used both for the defaults declared on an object type and for
/// the sparse overrides set on a single line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineAttributes {
    pub filters: Vec<u32>,
    pub bcg_group: Option<u32>,
    pub style: Option<String>,
    pub thickness: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolAttributes {
    pub filters: Vec<u32>,
    pub bcg_group: Option<u32>,
    pub style: Option<String>,
    pub font_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAttributes {
    pub filters: Vec<u32>,
    pub bcg_group: Option<u32>,
    pub font_size: Option<u32>,
    pub underline: Option<bool>,
    pub display: Option<bool>,
    pub x_offset: Option<i32>,
    pub y_offset: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLine {
    pub id: Option<String>,
    pub start_latitude: Option<String>,
    pub start_longitude: Option<String>,
    pub end_latitude: Option<String>,
    pub end_longitude: Option<String>,
    pub overrides: LineAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawText {
    pub lines: Vec<String>,
    pub overrides: TextAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSymbol {
    pub id: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub overrides: SymbolAttributes,
    pub texts: Vec<RawText>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawObjectType {
    pub map_object_type: String,
    pub map_group_id: String,
    pub line_defaults: LineAttributes,
    pub symbol_defaults: SymbolAttributes,
    pub text_defaults: TextAttributes,
    pub lines: Vec<RawLine>,
    pub symbols: Vec<RawSymbol>,
}

/// A geomap as ingested: attribute values are split into defaults and overrides, coordinates are
/// still sexagesimal strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGeomap {
    pub header: GeomapHeader,
    pub object_types: Vec<RawObjectType>,
}

/// Sorted, deduplicated set of filter groups. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterSet(BTreeSet<u32>);

impl FilterSet {
    /// Build a set from filter values; no values means [`ALWAYS_VISIBLE_FILTER`].
    pub fn new<I: IntoIterator<Item = u32>>(filters: I) -> Self {
        let mut set: BTreeSet<u32> = filters.into_iter().collect();
        if set.is_empty() {
            set.insert(ALWAYS_VISIBLE_FILTER);
        }
        Self(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl fmt::Display for FilterSet {
    /// Two-digit, space separated, e.g. `01 12`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.iter().map(|filter| format!("{:02}", filter)).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedLine {
    pub filters: FilterSet,
    pub bcg_group: Option<u32>,
    pub style: Option<String>,
    pub thickness: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedSymbol {
    pub filters: FilterSet,
    pub bcg_group: Option<u32>,
    pub style: Option<String>,
    pub font_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedText {
    pub filters: FilterSet,
    pub bcg_group: Option<u32>,
    pub font_size: Option<u32>,
    /// Not underlined unless set.
    pub underline: bool,
    /// Hidden unless set.
    pub display: bool,
    pub x_offset: Option<i32>,
    pub y_offset: Option<i32>,
}

/// A line segment with resolved attributes and converted endpoints (`x` = lon, `y` = lat).
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: String,
    pub start: geo::Coord,
    pub end: geo::Coord,
    pub applied: AppliedLine,
}

/// Text is always drawn at its owning symbol's position.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub lines: Vec<String>,
    pub applied: AppliedText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub id: String,
    pub position: geo::Coord,
    pub applied: AppliedSymbol,
    pub texts: Vec<Text>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub map_object_type: String,
    pub map_group_id: String,
    pub lines: Vec<Line>,
    pub symbols: Vec<Symbol>,
}

/// A geomap whose records all passed resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Geomap {
    pub header: GeomapHeader,
    pub object_types: Vec<ObjectType>,
}

impl Geomap {
    pub fn line_count(&self) -> usize {
        self.object_types.iter().map(|o| o.lines.len()).sum()
    }

    pub fn symbol_count(&self) -> usize {
        self.object_types.iter().map(|o| o.symbols.len()).sum()
    }
}
