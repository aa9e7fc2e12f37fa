//! Capture and pipeline configuration.
//!
//! Everything is loaded from a single TOML file with one table per
//! concern. Missing tables fall back to their defaults.

use super::frame::{ChromaOrder, Rotation};
use crate::processing::ColorRange;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the frame source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Frame width in pixels, sensor orientation.
    pub width: u32,
    /// Frame height in pixels, sensor orientation.
    pub height: u32,
    /// Target frames per second.
    pub fps: u32,
    /// Display rotation reported alongside each frame.
    pub rotation: Rotation,
    /// Order of the interleaved chroma pairs delivered by the sensor.
    pub chroma_order: ChromaOrder,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
            rotation: Rotation::Rot90,
            chroma_order: ChromaOrder::Vu,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration for the per-frame processing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Luma/chroma range assumed by the colour conversion.
    pub color_range: ColorRange,
    /// Per-channel difference above which a pixel counts as changed.
    pub motion_threshold: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            color_range: ColorRange::Full,
            motion_threshold: 24,
        }
    }
}

impl PipelineConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motion_threshold == 0 {
            return Err(ConfigError::InvalidThreshold);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    /// Frame rate outside 1-120.
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    /// Motion threshold is zero.
    #[error("invalid motion threshold (must be 1-255)")]
    InvalidThreshold,
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[capture]` section.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// `[pipeline]` section.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// `[output]` section.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration for the demo binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Run until interrupted (true) or process a fixed number of frames (false).
    pub continuous: bool,
    /// Number of frames to process if not continuous.
    pub frame_count: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 100,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.pipeline.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let mut config = CaptureConfig::default();
        config.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_zero_threshold_invalid() {
        let config = PipelineConfig {
            motion_threshold: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold)));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = FileConfig::from_toml(
            r#"
            [capture]
            width = 320
            height = 240
            rotation = "rot270"
            chroma_order = "uv"

            [pipeline]
            color_range = "limited"
            "#,
        )
        .unwrap();

        assert_eq!(config.capture.width, 320);
        assert_eq!(config.capture.fps, 30);
        assert_eq!(config.capture.rotation, Rotation::Rot270);
        assert_eq!(config.capture.chroma_order, ChromaOrder::Uv);
        assert_eq!(config.pipeline.color_range, ColorRange::Limited);
        assert_eq!(config.pipeline.motion_threshold, 24);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_serialized_default_parses_back() {
        let text = toml::to_string(&FileConfig::default()).unwrap();
        assert_eq!(FileConfig::from_toml(&text).unwrap(), FileConfig::default());
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let result = FileConfig::from_toml("[capture]\nwidth = \"wide\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_values_rejected_on_load() {
        let result = FileConfig::from_toml("[capture]\nfps = 500");
        assert!(matches!(result, Err(ConfigError::InvalidFrameRate)));
    }
}
