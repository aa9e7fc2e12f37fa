//! Metrics collection and registry.

use crate::session::SessionStats;
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of pipeline state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Whether an analyzer session is running.
    pub session_active: bool,
    /// Frames that produced a difference image.
    pub frames_processed: u64,
    /// Frames dropped because the worker was busy.
    pub frames_dropped: u64,
    /// Frames rejected for malformed planes.
    pub frames_rejected: u64,
    /// Difference-state reseeds caused by dimension changes.
    pub shape_resets: u64,
    /// Mean channel difference of the latest frame.
    pub motion_mean: Option<f64>,
    /// Changed-pixel fraction of the latest frame.
    pub motion_changed_fraction: Option<f64>,
}

impl MetricsSnapshot {
    /// Creates a snapshot from session counters.
    pub fn from_stats(stats: &SessionStats, session_active: bool) -> Self {
        Self {
            session_active,
            frames_processed: stats.frames_processed,
            frames_dropped: stats.frames_dropped,
            frames_rejected: stats.frames_rejected,
            shape_resets: stats.shape_resets,
            motion_mean: stats.last_motion.map(|m| m.mean),
            motion_changed_fraction: stats.last_motion.map(|m| m.changed_fraction),
        }
    }
}

/// Prometheus metrics registry for the frame pipeline.
pub struct MetricsRegistry {
    registry: Registry,

    session_active: IntGauge,

    // Frame counters
    frames_processed: IntCounter,
    frames_dropped: IntCounter,
    frames_rejected: IntCounter,
    shape_resets: IntCounter,

    // Motion of the latest frame
    motion_mean: Gauge,
    motion_changed_fraction: Gauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all pipeline metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let session_active = IntGauge::new(
            "motion_diff_session_active",
            "Whether an analyzer session is running (1=active, 0=stopped)",
        )?;

        let frames_processed = IntCounter::new(
            "motion_diff_frames_processed_total",
            "Total frames that produced a difference image",
        )?;
        let frames_dropped = IntCounter::new(
            "motion_diff_frames_dropped_total",
            "Total frames dropped because the analyzer was busy",
        )?;
        let frames_rejected = IntCounter::new(
            "motion_diff_frames_rejected_total",
            "Total frames rejected for plane sizes not matching their dimensions",
        )?;
        let shape_resets = IntCounter::new(
            "motion_diff_shape_resets_total",
            "Total difference-state reseeds caused by dimension changes",
        )?;

        let motion_mean = Gauge::new(
            "motion_diff_motion_mean",
            "Mean channel difference of the latest frame (0-255)",
        )?;
        let motion_changed_fraction = Gauge::new(
            "motion_diff_motion_changed_fraction",
            "Fraction of pixels above the motion threshold in the latest frame",
        )?;

        registry.register(Box::new(session_active.clone()))?;
        registry.register(Box::new(frames_processed.clone()))?;
        registry.register(Box::new(frames_dropped.clone()))?;
        registry.register(Box::new(frames_rejected.clone()))?;
        registry.register(Box::new(shape_resets.clone()))?;
        registry.register(Box::new(motion_mean.clone()))?;
        registry.register(Box::new(motion_changed_fraction.clone()))?;

        Ok(Self {
            registry,
            session_active,
            frames_processed,
            frames_dropped,
            frames_rejected,
            shape_resets,
            motion_mean,
            motion_changed_fraction,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.session_active
            .set(if snapshot.session_active { 1 } else { 0 });

        // Counters only move forward by the difference
        advance(&self.frames_processed, snapshot.frames_processed);
        advance(&self.frames_dropped, snapshot.frames_dropped);
        advance(&self.frames_rejected, snapshot.frames_rejected);
        advance(&self.shape_resets, snapshot.shape_resets);

        if let Some(mean) = snapshot.motion_mean {
            self.motion_mean.set(mean);
        }
        if let Some(fraction) = snapshot.motion_changed_fraction {
            self.motion_changed_fraction.set(fraction);
        }
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        assert!(MetricsRegistry::new().is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            session_active: true,
            frames_processed: 42,
            frames_dropped: 3,
            frames_rejected: 1,
            shape_resets: 2,
            motion_mean: Some(12.5),
            motion_changed_fraction: Some(0.25),
        };
        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("motion_diff_session_active 1"));
        assert!(output.contains("motion_diff_frames_processed_total 42"));
        assert!(output.contains("motion_diff_frames_dropped_total 3"));
        assert!(output.contains("motion_diff_shape_resets_total 2"));
        assert!(output.contains("motion_diff_motion_mean 12.5"));
    }

    #[test]
    fn test_counters_never_go_backwards() {
        let registry = MetricsRegistry::new().unwrap();

        registry.update(&MetricsSnapshot {
            frames_processed: 10,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            frames_processed: 4,
            ..Default::default()
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("motion_diff_frames_processed_total 10"));
    }

    #[test]
    fn test_snapshot_from_stats() {
        let stats = SessionStats {
            frames_processed: 5,
            frames_dropped: 1,
            ..Default::default()
        };
        let snapshot = MetricsSnapshot::from_stats(&stats, false);

        assert_eq!(snapshot.frames_processed, 5);
        assert_eq!(snapshot.frames_dropped, 1);
        assert!(!snapshot.session_active);
        assert!(snapshot.motion_mean.is_none());
    }
}
