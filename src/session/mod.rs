//! Session lifecycle and the analyzer thread.
//!
//! The host drives the pipeline through an explicit start/stop lifecycle.
//! [`AnalyzerSession`] is the synchronous form; [`FrameWorker`] runs one on
//! a dedicated thread and applies the drop-when-busy delivery policy.

mod analyzer;
mod worker;

pub use analyzer::{Analysis, AnalyzerSession, SessionStats};
pub use worker::{FrameSink, FrameWorker, Submission};

use thiserror::Error;

/// Errors from the session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A frame arrived before `start` or after `stop`.
    #[error("analyzer session not started")]
    NotStarted,
    /// The OS refused to create the analyzer thread.
    #[error("failed to spawn analyzer thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),
    /// The analyzer thread has exited or was shut down.
    #[error("analyzer thread is no longer running")]
    WorkerStopped,
    /// The analyzer thread panicked.
    #[error("analyzer thread panicked")]
    WorkerPanicked,
}
