//! Semi-planar 4:2:0 to RGB conversion.
//!
//! The sensor delivers chroma pairs as V,U (NV21). The decoder first packs
//! luma and chroma into one semi-planar buffer in U,V order, then converts
//! each pixel with 8-bit fixed-point coefficients.

use super::raster::{RgbRaster, CHANNELS};
use crate::capture::{ChromaOrder, RawFrame};
use serde::{Deserialize, Serialize};

/// Range of the luma and chroma samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRange {
    /// Full 0-255 range (JFIF).
    #[default]
    Full,
    /// BT.601 video range, luma 16-235.
    Limited,
}

/// Fixed-point coefficients, scaled by 256.
struct Coefficients {
    luma: i32,
    luma_offset: i32,
    r_v: i32,
    g_u: i32,
    g_v: i32,
    b_u: i32,
}

impl ColorRange {
    fn coefficients(self) -> Coefficients {
        match self {
            ColorRange::Full => Coefficients {
                luma: 256,
                luma_offset: 0,
                r_v: 359,
                g_u: 88,
                g_v: 183,
                b_u: 454,
            },
            ColorRange::Limited => Coefficients {
                luma: 298,
                luma_offset: 16,
                r_v: 409,
                g_u: 100,
                g_v: 208,
                b_u: 516,
            },
        }
    }
}

/// Converts raw sensor frames to interleaved RGB.
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    range: ColorRange,
}

impl FrameDecoder {
    /// Creates a decoder for samples in the given range.
    pub fn new(range: ColorRange) -> Self {
        Self { range }
    }

    /// Decodes a frame into an RGB raster of the same dimensions.
    pub fn decode(&self, frame: &RawFrame) -> RgbRaster {
        let semi_planar = pack_semi_planar(frame);
        let rgb = self.convert(&semi_planar, frame.width() as usize, frame.height() as usize);

        tracing::trace!(
            sequence = frame.sequence(),
            width = frame.width(),
            height = frame.height(),
            "Decoded frame"
        );

        RgbRaster::from_parts(frame.width(), frame.height(), rgb)
    }

    /// Converts a U,V-ordered semi-planar buffer to RGB.
    fn convert(&self, semi_planar: &[u8], width: usize, height: usize) -> Vec<u8> {
        let c = self.range.coefficients();
        let (luma, chroma) = semi_planar.split_at(width * height);
        let chroma_stride = width.div_ceil(2) * 2;
        let mut rgb = vec![0u8; width * height * CHANNELS];

        for (y, (luma_row, rgb_row)) in luma
            .chunks_exact(width)
            .zip(rgb.chunks_exact_mut(width * CHANNELS))
            .enumerate()
        {
            let chroma_row = &chroma[(y / 2) * chroma_stride..][..chroma_stride];

            for (x, (&l, px)) in luma_row
                .iter()
                .zip(rgb_row.chunks_exact_mut(CHANNELS))
                .enumerate()
            {
                let u = chroma_row[(x / 2) * 2] as i32 - 128;
                let v = chroma_row[(x / 2) * 2 + 1] as i32 - 128;
                let scaled = (l as i32 - c.luma_offset) * c.luma;

                px[0] = clamp_channel(scaled + c.r_v * v);
                px[1] = clamp_channel(scaled - c.g_u * u - c.g_v * v);
                px[2] = clamp_channel(scaled + c.b_u * u);
            }
        }

        rgb
    }
}

/// Rounds a value scaled by 256 and clamps it to a byte.
#[inline]
fn clamp_channel(scaled: i32) -> u8 {
    ((scaled + 128) >> 8).clamp(0, 255) as u8
}

/// Packs the frame into one `luma ++ chroma` buffer with chroma in U,V order.
fn pack_semi_planar(frame: &RawFrame) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(frame.luma().len() + frame.chroma().len());
    buffer.extend_from_slice(frame.luma());

    match frame.chroma_order() {
        ChromaOrder::Uv => buffer.extend_from_slice(frame.chroma()),
        ChromaOrder::Vu => {
            for pair in frame.chroma().chunks_exact(2) {
                buffer.push(pair[1]);
                buffer.push(pair[0]);
            }
        }
    }

    buffer
}
