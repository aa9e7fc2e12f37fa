//! Temporal differencing against the previous frame.
//!
//! Each output byte is the absolute change of that channel since the last
//! frame, so static scenery goes black and motion lights up.

use super::raster::{DiffRaster, RgbRaster};

/// What the engine remembers between frames.
#[derive(Debug, Clone, Default)]
pub enum DiffState {
    /// No frame seen since start or reset.
    #[default]
    Empty,
    /// Holds the most recent corrected frame.
    Primed(RgbRaster),
}

/// Computes per-pixel differences between consecutive frames.
#[derive(Debug, Default)]
pub struct DiffEngine {
    state: DiffState,
    shape_resets: u64,
}

impl DiffEngine {
    /// Creates an engine in the empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Differences `current` against the stored frame, then stores `current`.
    ///
    /// The first frame is compared with itself and yields an all-zero
    /// image. A stored frame with different dimensions is discarded and
    /// the output is all-zero as well.
    pub fn diff(&mut self, current: RgbRaster) -> DiffRaster {
        let output = match &self.state {
            DiffState::Empty => RgbRaster::zeroed(current.width(), current.height()),
            DiffState::Primed(previous) if previous.dimensions() != current.dimensions() => {
                self.shape_resets += 1;
                tracing::warn!(
                    previous = ?previous.dimensions(),
                    current = ?current.dimensions(),
                    "Frame dimensions changed, reseeding difference state"
                );
                RgbRaster::zeroed(current.width(), current.height())
            }
            DiffState::Primed(previous) => absolute_difference(&current, previous),
        };

        self.state = DiffState::Primed(current);
        DiffRaster::new(output)
    }

    /// Forgets the stored frame.
    pub fn reset(&mut self) {
        self.state = DiffState::Empty;
    }

    /// Returns true once a frame has been stored.
    pub fn is_primed(&self) -> bool {
        matches!(self.state, DiffState::Primed(_))
    }

    /// Returns the current state.
    pub fn state(&self) -> &DiffState {
        &self.state
    }

    /// Number of times a dimension change forced a reseed.
    pub fn shape_resets(&self) -> u64 {
        self.shape_resets
    }
}

fn absolute_difference(current: &RgbRaster, previous: &RgbRaster) -> RgbRaster {
    let data = current
        .data()
        .iter()
        .zip(previous.data())
        .map(|(&c, &p)| c.abs_diff(p))
        .collect();

    RgbRaster::from_parts(current.width(), current.height(), data)
}
