pub mod key;
pub mod strategy;

pub use key::{GeometryKind, GroupDefaults, GroupKey};
pub use strategy::{GroupingStrategy, RecordRef};
