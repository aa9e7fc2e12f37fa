//! Camera input and frame handling.
//!
//! This module describes what the host camera hands to the pipeline: raw
//! semi-planar frames tagged with the current display rotation. The
//! camera itself is an external collaborator behind [`FrameSource`].

mod camera;
mod config;
mod frame;

pub use camera::{CameraError, FrameSource, MockCamera};
pub use config::{CaptureConfig, ConfigError, FileConfig, OutputConfig, PipelineConfig};
pub use frame::{chroma_len, luma_len, ChromaOrder, FrameError, RawFrame, Rotation};
