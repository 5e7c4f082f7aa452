use crate::geomap::FilterSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GeometryKind {
    Lines,
    Symbols,
    Text,
}

impl GeometryKind {
    /// Suffix naming the kind in group tokens and file names.
    pub fn suffix(&self) -> &'static str {
        match self {
            GeometryKind::Lines => "Lines",
            GeometryKind::Symbols => "Symbols",
            GeometryKind::Text => "Text",
        }
    }

    /// Property set on a group's default marker feature.
    pub fn defaults_property(&self) -> &'static str {
        match self {
            GeometryKind::Lines => "isLineDefaults",
            GeometryKind::Symbols => "isSymbolDefaults",
            GeometryKind::Text => "isTextDefaults",
        }
    }
}

/// Rendering attributes shared by every record of an attribute-signature group.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupDefaults {
    pub bcg_group: Option<u32>,
    pub filters: Vec<u32>,
    pub style: Option<String>,
    pub thickness: Option<u32>,
    pub font_size: Option<u32>,
    pub underline: Option<bool>,
    pub x_offset: Option<i32>,
    pub y_offset: Option<i32>,
}

/// Logical output key. Every feature assigned the same key ends up in the same collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// One group per exact applied filter set and geometry kind.
    Filter {
        filters: FilterSet,
        kind: GeometryKind,
    },
    /// One group per rendering attribute signature and geometry kind. `defaults` holds the
    /// values the signature was rendered from.
    Signature {
        signature: String,
        kind: GeometryKind,
        defaults: GroupDefaults,
    },
    /// Everything of a geomap in one group.
    Raw,
}

impl GroupKey {
    pub fn kind(&self) -> Option<GeometryKind> {
        match self {
            GroupKey::Filter { kind, .. } | GroupKey::Signature { kind, .. } => Some(*kind),
            GroupKey::Raw => None,
        }
    }

    /// Token without the kind suffix, e.g. `Filter_05` or `Multi-Filter_01_02`.
    pub fn base_token(&self) -> String {
        match self {
            GroupKey::Filter { filters, .. } => filter_token(filters),
            GroupKey::Signature { signature, .. } => signature.clone(),
            GroupKey::Raw => "Raw".to_string(),
        }
    }

    /// Full token, e.g. `Filter_05_Lines`.
    pub fn token(&self) -> String {
        match self.kind() {
            Some(kind) => format!("{}_{}", self.base_token(), kind.suffix()),
            None => self.base_token(),
        }
    }
}

fn filter_token(filters: &FilterSet) -> String {
    if filters.len() == 1 {
        format!("Filter_{}", filters)
    } else {
        let filters: Vec<String> = filters.iter().map(|f| format!("{:02}", f)).collect();
        format!("Multi-Filter_{}", filters.join("_"))
    }
}
