pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod sink;
pub mod wkt;

pub use error::{LinrefError, Result};
