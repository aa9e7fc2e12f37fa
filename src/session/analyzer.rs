//! Analyzer session lifecycle.
//!
//! The host starts a session when the camera becomes available and stops
//! it on teardown. The difference state exists only while the session is
//! running.

use super::SessionError;
use crate::analysis::MotionStats;
use crate::capture::{PipelineConfig, RawFrame};
use crate::processing::{DiffRaster, Pipeline};
use chrono::{DateTime, Utc};
use std::fmt;

/// Counters describing one session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// When the session was started.
    pub started_at: DateTime<Utc>,
    /// Frames that produced a difference image.
    pub frames_processed: u64,
    /// Frames dropped at the boundary because the worker was busy.
    ///
    /// Only a [`FrameWorker`](super::FrameWorker) sees the boundary, so
    /// this stays zero for a session driven directly.
    pub frames_dropped: u64,
    /// Frames rejected at the boundary because their planes did not match
    /// their dimensions. Counted by the worker, like `frames_dropped`.
    pub frames_rejected: u64,
    /// Times a dimension change forced the difference state to reseed.
    pub shape_resets: u64,
    /// Motion summary of the most recent frame.
    pub last_motion: Option<MotionStats>,
}

impl SessionStats {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            frames_processed: 0,
            frames_dropped: 0,
            frames_rejected: 0,
            shape_resets: 0,
            last_motion: None,
        }
    }

    /// Time elapsed since the session started.
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} dropped, {} rejected, {} shape resets",
            self.frames_processed, self.frames_dropped, self.frames_rejected, self.shape_resets
        )
    }
}

/// A difference image together with its motion summary.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The difference image.
    pub diff: DiffRaster,
    /// Motion measured in `diff`.
    pub motion: MotionStats,
}

/// Owns the pipeline for the duration of one camera session.
pub struct AnalyzerSession {
    config: PipelineConfig,
    pipeline: Option<Pipeline>,
    stats: SessionStats,
}

impl AnalyzerSession {
    /// Creates a stopped session.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            pipeline: None,
            stats: SessionStats::new(),
        }
    }

    /// Allocates a fresh difference state and resets the counters.
    ///
    /// Starting a running session has no effect.
    pub fn start(&mut self) {
        if self.pipeline.is_some() {
            tracing::debug!("Analyzer session already running");
            return;
        }
        self.pipeline = Some(Pipeline::new(&self.config));
        self.stats = SessionStats::new();
        tracing::info!(color_range = ?self.config.color_range, "Analyzer session started");
    }

    /// Releases the difference state and returns the final counters.
    pub fn stop(&mut self) -> SessionStats {
        if self.pipeline.take().is_some() {
            tracing::info!(
                processed = self.stats.frames_processed,
                shape_resets = self.stats.shape_resets,
                "Analyzer session stopped"
            );
        }
        self.stats.clone()
    }

    /// Returns true between `start` and `stop`.
    pub fn is_active(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Runs one frame through the pipeline.
    pub fn analyze(&mut self, frame: &RawFrame) -> Result<Analysis, SessionError> {
        let pipeline = self.pipeline.as_mut().ok_or(SessionError::NotStarted)?;

        let diff = pipeline.process(frame);
        let motion = MotionStats::analyze(&diff, self.config.motion_threshold);

        self.stats.frames_processed += 1;
        self.stats.shape_resets = pipeline.engine().shape_resets();
        self.stats.last_motion = Some(motion);

        tracing::trace!(
            sequence = frame.sequence(),
            mean = motion.mean,
            changed = motion.changed_fraction,
            "Frame analyzed"
        );

        Ok(Analysis { diff, motion })
    }

    /// Returns the counters of the current or last session.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Rotation;

    #[test]
    fn test_analyze_requires_start() {
        let mut session = AnalyzerSession::new(PipelineConfig::default());
        let frame = RawFrame::uniform(4, 4, 0, Rotation::Rot90).unwrap();

        assert!(!session.is_active());
        assert!(matches!(
            session.analyze(&frame),
            Err(SessionError::NotStarted)
        ));
    }

    #[test]
    fn test_session_counts_frames() {
        let mut session = AnalyzerSession::new(PipelineConfig::default());
        session.start();

        let black = RawFrame::uniform(4, 4, 0, Rotation::Rot90).unwrap();
        let white = RawFrame::uniform(4, 4, 255, Rotation::Rot90).unwrap();

        let first = session.analyze(&black).unwrap();
        assert!(first.diff.is_blank());
        assert!(!first.motion.has_motion());

        let second = session.analyze(&white).unwrap();
        assert!(!second.diff.is_blank());
        assert!(second.motion.has_motion());

        let stats = session.stop();
        assert_eq!(stats.frames_processed, 2);
        assert_eq!(stats.last_motion, Some(second.motion));
        assert_eq!(stats.frames_dropped, 0);
        assert!(!session.is_active());
    }

    #[test]
    fn test_restart_reseeds_state() {
        let mut session = AnalyzerSession::new(PipelineConfig::default());
        session.start();
        session
            .analyze(&RawFrame::uniform(4, 4, 0, Rotation::Rot90).unwrap())
            .unwrap();
        session.stop();

        session.start();
        assert_eq!(session.stats().frames_processed, 0);
        let analysis = session
            .analyze(&RawFrame::uniform(4, 4, 255, Rotation::Rot90).unwrap())
            .unwrap();
        assert!(analysis.diff.is_blank());
    }

    #[test]
    fn test_start_twice_keeps_state() {
        let mut session = AnalyzerSession::new(PipelineConfig::default());
        session.start();
        session
            .analyze(&RawFrame::uniform(4, 4, 0, Rotation::Rot90).unwrap())
            .unwrap();
        session.start();

        assert_eq!(session.stats().frames_processed, 1);
        let analysis = session
            .analyze(&RawFrame::uniform(4, 4, 255, Rotation::Rot90).unwrap())
            .unwrap();
        assert!(!analysis.diff.is_blank());
    }

    #[test]
    fn test_shape_resets_are_reported() {
        let mut session = AnalyzerSession::new(PipelineConfig::default());
        session.start();
        session
            .analyze(&RawFrame::uniform(6, 4, 0, Rotation::Rot90).unwrap())
            .unwrap();
        session
            .analyze(&RawFrame::uniform(6, 4, 0, Rotation::Rot180).unwrap())
            .unwrap();

        assert_eq!(session.stats().shape_resets, 1);
    }

    #[test]
    fn test_summary_line() {
        let stats = SessionStats {
            frames_processed: 29,
            frames_dropped: 1,
            frames_rejected: 2,
            shape_resets: 3,
            ..Default::default()
        };
        assert_eq!(
            stats.to_string(),
            "29 processed, 1 dropped, 2 rejected, 3 shape resets"
        );
    }
}
