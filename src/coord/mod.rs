pub mod dms;

pub use dms::{dms_to_decimal, position_from_dms, CoordinateError};
