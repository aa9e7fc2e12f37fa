//! Summary statistics of a difference image.

use crate::processing::{DiffRaster, CHANNELS};

/// How much changed between two frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStats {
    /// Mean channel difference, 0-255.
    pub mean: f64,
    /// Largest channel difference.
    pub peak: u8,
    /// Fraction of pixels with any channel above the threshold.
    pub changed_fraction: f64,
    /// Number of pixels analyzed.
    pub sample_size: usize,
}

impl MotionStats {
    /// Analyzes a difference image.
    ///
    /// A pixel counts as changed when any of its channels exceeds
    /// `threshold`.
    pub fn analyze(diff: &DiffRaster, threshold: u8) -> Self {
        let data = diff.data();
        if data.is_empty() {
            return Self::still(0);
        }

        let sum: u64 = data.iter().map(|&v| v as u64).sum();
        let peak = data.iter().copied().max().unwrap_or(0);
        let pixels = data.len() / CHANNELS;
        let changed = data
            .chunks_exact(CHANNELS)
            .filter(|px| px.iter().any(|&v| v > threshold))
            .count();

        Self {
            mean: sum as f64 / data.len() as f64,
            peak,
            changed_fraction: changed as f64 / pixels as f64,
            sample_size: pixels,
        }
    }

    fn still(sample_size: usize) -> Self {
        Self {
            mean: 0.0,
            peak: 0,
            changed_fraction: 0.0,
            sample_size,
        }
    }

    /// Returns true if any pixel exceeded the threshold.
    pub fn has_motion(&self) -> bool {
        self.changed_fraction > 0.0
    }
}
