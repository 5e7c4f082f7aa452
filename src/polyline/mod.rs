pub mod merge;

pub use merge::{merge_segments, PolylineMerger};
