//! Dedicated analyzer thread.
//!
//! The worker holds a single "ready" token while it is idle. Submitting a
//! frame takes the token and the worker hands it back once the frame is
//! rendered, so at most one frame is in flight. A frame offered while the
//! token is out is dropped at the boundary instead of queued.

use super::{AnalyzerSession, Analysis, SessionError, SessionStats};
use crate::capture::{FrameError, PipelineConfig, RawFrame};
use flume::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

/// Receives analysed frames from the worker.
pub trait FrameSink: Send + 'static {
    /// Displays one difference image and its motion summary.
    fn render(&mut self, analysis: Analysis);
}

impl<F> FrameSink for F
where
    F: FnMut(Analysis) + Send + 'static,
{
    fn render(&mut self, analysis: Analysis) {
        self(analysis)
    }
}

/// Outcome of offering a frame to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The worker took the frame.
    Accepted,
    /// The worker was busy; the frame was discarded.
    Dropped,
}

/// Runs an [`AnalyzerSession`] on its own thread.
///
/// Drop and reject counts live here, since only the submitting side sees
/// them. They are merged into the session's counters on shutdown.
pub struct FrameWorker {
    frames: Option<Sender<RawFrame>>,
    ready: Option<Receiver<()>>,
    handle: Option<JoinHandle<SessionStats>>,
    dropped: u64,
    rejected: u64,
}

impl FrameWorker {
    /// Starts a session on a new thread that renders into `sink`.
    pub fn spawn<S: FrameSink>(config: PipelineConfig, sink: S) -> Result<Self, SessionError> {
        let (frame_tx, frame_rx) = flume::bounded(1);
        let (ready_tx, ready_rx) = flume::bounded(1);
        // The worker starts idle.
        let _ = ready_tx.try_send(());

        let handle = thread::Builder::new()
            .name("frame-analyzer".into())
            .spawn(move || run(frame_rx, ready_tx, config, sink))?;

        Ok(Self {
            frames: Some(frame_tx),
            ready: Some(ready_rx),
            handle: Some(handle),
            dropped: 0,
            rejected: 0,
        })
    }

    /// Offers a frame without waiting. Dropped if the worker is busy.
    pub fn submit(&mut self, frame: RawFrame) -> Result<Submission, SessionError> {
        let ready = self.ready.as_ref().ok_or(SessionError::WorkerStopped)?;

        match ready.try_recv() {
            Ok(()) => {
                self.hand_over(frame)?;
                Ok(Submission::Accepted)
            }
            Err(TryRecvError::Empty) => {
                self.dropped += 1;
                tracing::debug!(sequence = frame.sequence(), "Analyzer busy, dropping frame");
                Ok(Submission::Dropped)
            }
            Err(TryRecvError::Disconnected) => Err(SessionError::WorkerStopped),
        }
    }

    /// Waits until the worker is idle, then hands over the frame.
    pub fn submit_blocking(&mut self, frame: RawFrame) -> Result<(), SessionError> {
        let ready = self.ready.as_ref().ok_or(SessionError::WorkerStopped)?;
        ready.recv().map_err(|_| SessionError::WorkerStopped)?;
        self.hand_over(frame)
    }

    /// Records a frame that failed validation at the boundary.
    pub fn reject(&mut self, error: &FrameError) {
        self.rejected += 1;
        tracing::warn!(%error, "Rejected malformed frame");
    }

    /// Stops the session, waits for the in-flight frame and returns the
    /// final counters.
    pub fn shutdown(mut self) -> Result<SessionStats, SessionError> {
        self.finish()
    }

    fn hand_over(&self, frame: RawFrame) -> Result<(), SessionError> {
        let frames = self.frames.as_ref().ok_or(SessionError::WorkerStopped)?;
        // Holding the token means the slot is free.
        frames.send(frame).map_err(|_| SessionError::WorkerStopped)
    }

    fn finish(&mut self) -> Result<SessionStats, SessionError> {
        // Closing the frame channel ends the worker loop.
        self.frames = None;
        self.ready = None;
        let handle = self.handle.take().ok_or(SessionError::WorkerStopped)?;
        let mut stats = handle.join().map_err(|_| SessionError::WorkerPanicked)?;

        stats.frames_dropped = self.dropped;
        stats.frames_rejected = self.rejected;
        tracing::info!(%stats, "Frame worker stopped");
        Ok(stats)
    }
}

impl Drop for FrameWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.finish() {
                tracing::error!(error = %e, "Analyzer thread did not shut down cleanly");
            }
        }
    }
}

fn run<S: FrameSink>(
    frames: Receiver<RawFrame>,
    ready: Sender<()>,
    config: PipelineConfig,
    mut sink: S,
) -> SessionStats {
    let mut session = AnalyzerSession::new(config);
    session.start();

    for frame in frames.iter() {
        tracing::debug!(sequence = frame.sequence(), "Analyzer received frame");
        match session.analyze(&frame) {
            Ok(analysis) => sink.render(analysis),
            Err(e) => tracing::warn!(error = %e, "Frame analysis failed"),
        }
        // The submitter may already be gone.
        let _ = ready.try_send(());
    }

    session.stop()
}
