//! Motion Difference Library
//!
//! Turns a live stream of semi-planar camera frames into a motion image:
//! every output pixel shows how much that pixel changed since the
//! previous frame.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → decode → orientation → diff → sink
//!                                    ↓
//!                          analysis (motion stats) → metrics
//! ```
//!
//! # Design Principles
//!
//! - **Validated at the boundary**: malformed frames are rejected before
//!   they reach the pipeline, so every stage is total
//! - **One frame in flight**: a single worker processes frames serially and
//!   drops new ones while busy
//! - **Minimal state**: only the previous corrected frame is retained
//!
//! # Example
//!
//! ```no_run
//! use motion_diff::{
//!     capture::{CaptureConfig, FrameSource, MockCamera, PipelineConfig},
//!     session::AnalyzerSession,
//! };
//!
//! let mut camera = MockCamera::new();
//! camera.open(&CaptureConfig::default()).unwrap();
//!
//! let mut session = AnalyzerSession::new(PipelineConfig::default());
//! session.start();
//!
//! for _ in 0..10 {
//!     let frame = camera.capture().unwrap();
//!     let analysis = session.analyze(&frame).unwrap();
//!     let diff = &analysis.diff;
//!     println!("{}x{} diff, mean change {:.2}", diff.width(), diff.height(), analysis.motion.mean);
//! }
//!
//! let stats = session.stop();
//! println!("processed {} frames", stats.frames_processed);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod capture;
pub mod metrics;
pub mod processing;
pub mod session;

// Re-export commonly used types at crate root
pub use analysis::MotionStats;
pub use capture::{CaptureConfig, FileConfig, FrameSource, MockCamera, RawFrame, Rotation};
pub use processing::{DiffEngine, DiffRaster, FrameDecoder, OrientationCorrector, Pipeline, RgbRaster};
pub use session::{Analysis, AnalyzerSession, FrameSink, FrameWorker, SessionStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
