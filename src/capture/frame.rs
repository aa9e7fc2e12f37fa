//! Raw sensor frame as delivered by the camera.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display rotation state at the moment a frame was delivered.
///
/// The sensor is mounted rotated relative to the display, so each state
/// selects a different corrective transform downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Natural orientation.
    Rot0,
    /// Rotated a quarter turn. The sensor's own orientation.
    #[default]
    Rot90,
    /// Upside down.
    Rot180,
    /// Rotated three quarter turns.
    Rot270,
}

impl Rotation {
    /// Maps a rotation in degrees to a rotation state.
    ///
    /// Any multiple of 90 is accepted, including negative values. Anything
    /// else falls back to [`Rotation::Rot0`], which shares its transform
    /// with [`Rotation::Rot180`].
    pub fn from_degrees(degrees: i32) -> Self {
        if degrees % 90 != 0 {
            return Rotation::Rot0;
        }
        match degrees.rem_euclid(360) {
            90 => Rotation::Rot90,
            180 => Rotation::Rot180,
            270 => Rotation::Rot270,
            _ => Rotation::Rot0,
        }
    }

    /// Maps the host's display rotation index (0..=3) to a rotation state.
    pub fn from_surface_index(index: u8) -> Self {
        match index {
            1 => Rotation::Rot90,
            2 => Rotation::Rot180,
            3 => Rotation::Rot270,
            _ => Rotation::Rot0,
        }
    }

    /// Returns the rotation in degrees.
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Rot0 => 0,
            Rotation::Rot90 => 90,
            Rotation::Rot180 => 180,
            Rotation::Rot270 => 270,
        }
    }
}

/// Order of the two interleaved chroma components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromaOrder {
    /// V before U (NV21). What the sensor delivers.
    #[default]
    Vu,
    /// U before V (NV12).
    Uv,
}

/// Frame validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Width or height is zero.
    #[error("frame dimensions must be non-zero")]
    ZeroDimensions,
    /// A plane's length does not match the frame dimensions.
    #[error("{plane} plane has {actual} bytes, expected {expected}")]
    InvalidInputSize {
        /// Which plane, `"luma"` or `"chroma"`.
        plane: &'static str,
        /// Length implied by the dimensions.
        expected: usize,
        /// Length received.
        actual: usize,
    },
}

/// A single semi-planar 4:2:0 frame from the camera.
///
/// One full-resolution luma plane and one half-resolution plane of
/// interleaved chroma pairs. Plane sizes are checked on construction, so
/// every `RawFrame` in existence is safe to decode.
#[derive(Clone)]
pub struct RawFrame {
    luma: Vec<u8>,
    chroma: Vec<u8>,
    width: u32,
    height: u32,
    rotation: Rotation,
    chroma_order: ChromaOrder,
    sequence: u64,
}

impl RawFrame {
    /// Creates an NV21 frame from its two planes.
    pub fn new(
        width: u32,
        height: u32,
        luma: Vec<u8>,
        chroma: Vec<u8>,
        rotation: Rotation,
    ) -> Result<Self, FrameError> {
        Self::with_chroma_order(width, height, luma, chroma, rotation, ChromaOrder::Vu)
    }

    /// Creates a frame whose chroma pairs are stored in `chroma_order`.
    pub fn with_chroma_order(
        width: u32,
        height: u32,
        luma: Vec<u8>,
        chroma: Vec<u8>,
        rotation: Rotation,
        chroma_order: ChromaOrder,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroDimensions);
        }

        let expected_luma = luma_len(width, height);
        if luma.len() != expected_luma {
            return Err(FrameError::InvalidInputSize {
                plane: "luma",
                expected: expected_luma,
                actual: luma.len(),
            });
        }

        let expected_chroma = chroma_len(width, height);
        if chroma.len() != expected_chroma {
            return Err(FrameError::InvalidInputSize {
                plane: "chroma",
                expected: expected_chroma,
                actual: chroma.len(),
            });
        }

        Ok(Self {
            luma,
            chroma,
            width,
            height,
            rotation,
            chroma_order,
            sequence: 0,
        })
    }

    /// Creates a frame of uniform luma and neutral chroma.
    pub fn uniform(width: u32, height: u32, luma: u8, rotation: Rotation) -> Result<Self, FrameError> {
        Self::new(
            width,
            height,
            vec![luma; luma_len(width, height)],
            vec![128; chroma_len(width, height)],
            rotation,
        )
    }

    /// Tags the frame with a delivery sequence number.
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Returns the luma plane.
    #[inline]
    pub fn luma(&self) -> &[u8] {
        &self.luma
    }

    /// Returns the interleaved chroma plane.
    #[inline]
    pub fn chroma(&self) -> &[u8] {
        &self.chroma
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the display rotation captured with this frame.
    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Returns the order of the chroma pairs.
    #[inline]
    pub fn chroma_order(&self) -> ChromaOrder {
        self.chroma_order
    }

    /// Returns the delivery sequence number, 0 if untagged.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        luma_len(self.width, self.height)
    }
}

impl std::fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rotation", &self.rotation)
            .field("chroma_order", &self.chroma_order)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// Size of the luma plane for the given dimensions.
#[inline]
pub fn luma_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}

/// Size of the interleaved chroma plane for the given dimensions.
///
/// One pair per 2x2 block, rounding odd dimensions up. Equals
/// `width * height / 2` when both dimensions are even.
#[inline]
pub fn chroma_len(width: u32, height: u32) -> usize {
    2 * (width as usize).div_ceil(2) * (height as usize).div_ceil(2)
}
