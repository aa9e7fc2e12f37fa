//! Frame source abstraction.
//!
//! Real camera binding lives with the host platform. The core only sees
//! this trait, and a synthetic source stands in for tests and the demo.

use super::frame::{chroma_len, luma_len, FrameError, RawFrame};
use super::CaptureConfig;
use thiserror::Error;

/// Errors that can occur during frame source operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// The requested capture settings were refused.
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    /// The delivered frame failed validation.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(#[from] FrameError),
    /// `capture` was called before `open`.
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for anything that delivers raw frames.
pub trait FrameSource {
    /// Opens and initializes the source with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<RawFrame, CameraError>;

    /// Checks if the source is currently open.
    fn is_open(&self) -> bool;

    /// Closes the source and releases resources.
    fn close(&mut self);
}

/// Background luma of synthetic frames.
const BACKGROUND_LUMA: u8 = 16;
/// Luma of the moving square.
const SQUARE_LUMA: u8 = 235;

/// Synthetic source: a bright square sliding across a dark, neutral frame.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
}

impl MockCamera {
    /// Creates a closed camera.
    pub fn new() -> Self {
        Self::default()
    }

    fn render_luma(config: &CaptureConfig, sequence: u64) -> Vec<u8> {
        let width = config.width as usize;
        let height = config.height as usize;
        let side = (width.min(height) / 4).max(1);
        let x0 = (sequence as usize * 2) % width;
        let y0 = (height - side.min(height)) / 2;

        let mut luma = vec![BACKGROUND_LUMA; luma_len(config.width, config.height)];
        for row in luma.chunks_exact_mut(width).skip(y0).take(side) {
            for x in 0..side {
                row[(x0 + x) % width] = SQUARE_LUMA;
            }
        }
        luma
    }
}

impl FrameSource for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<RawFrame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;

        let luma = Self::render_luma(config, self.sequence);
        let chroma = vec![128u8; chroma_len(config.width, config.height)];

        self.sequence += 1;
        let frame = RawFrame::with_chroma_order(
            config.width,
            config.height,
            luma,
            chroma,
            config.rotation,
            config.chroma_order,
        )?;
        Ok(frame.with_sequence(self.sequence))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}
