//! Motion analysis of difference images.
//!
//! Turns each [`DiffRaster`](crate::processing::DiffRaster) into a few
//! numbers suitable for logging and metrics.

mod motion;

pub use motion::MotionStats;
