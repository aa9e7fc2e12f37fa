//! Per-frame image pipeline.
//!
//! Each raw frame flows through three stages:
//!
//! ```text
//! RawFrame → FrameDecoder → OrientationCorrector → DiffEngine → DiffRaster
//! ```
//!
//! Only the difference stage keeps state between frames.

mod decoder;
mod diff;
mod orientation;
mod raster;

pub use decoder::{ColorRange, FrameDecoder};
pub use diff::{DiffEngine, DiffState};
pub use orientation::{OrientationCorrector, Transform};
pub use raster::{DiffRaster, RgbRaster, CHANNELS};

use crate::capture::{PipelineConfig, RawFrame};

/// Runs decode, orientation correction and differencing in order.
#[derive(Debug, Default)]
pub struct Pipeline {
    decoder: FrameDecoder,
    corrector: OrientationCorrector,
    engine: DiffEngine,
}

impl Pipeline {
    /// Builds the three stages from the pipeline settings.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            decoder: FrameDecoder::new(config.color_range),
            corrector: OrientationCorrector::new(),
            engine: DiffEngine::new(),
        }
    }

    /// Processes one frame and returns its difference image.
    pub fn process(&mut self, frame: &RawFrame) -> DiffRaster {
        let rgb = self.decoder.decode(frame);
        let upright = self.corrector.correct(rgb, frame.rotation());
        self.engine.diff(upright)
    }

    /// Forgets the previous frame.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Returns the difference stage.
    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }
}
