//! Prometheus metrics for the frame pipeline.
//!
//! Metrics are collected into a registry and rendered in text exposition
//! format on demand. There is no HTTP endpoint.
//!
//! # Metrics Exposed
//!
//! - `motion_diff_session_active` - Whether a session is running (1/0)
//! - `motion_diff_frames_processed_total` - Frames that produced a diff
//! - `motion_diff_frames_dropped_total` - Frames dropped while the worker was busy
//! - `motion_diff_frames_rejected_total` - Frames with malformed planes
//! - `motion_diff_shape_resets_total` - Reseeds caused by dimension changes
//! - `motion_diff_motion_mean` - Mean channel difference of the latest frame
//! - `motion_diff_motion_changed_fraction` - Changed-pixel fraction of the latest frame
//!
//! # Example
//!
//! ```no_run
//! use motion_diff::metrics::{MetricsRegistry, MetricsSnapshot};
//! use motion_diff::session::SessionStats;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! let stats = SessionStats::default();
//! registry.update(&MetricsSnapshot::from_stats(&stats, true));
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
