pub mod assembler;
pub mod marker;

pub use assembler::{FeatureAssembler, GeomapOutput};
