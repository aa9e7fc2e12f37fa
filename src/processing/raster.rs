//! Interleaved RGB pixel buffers.

/// Bytes per RGB pixel.
pub const CHANNELS: usize = 3;

/// A row-major, interleaved 3-channel image.
///
/// `data.len() == width * height * 3` holds for every instance.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbRaster {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl RgbRaster {
    /// Wraps an existing buffer, returning `None` if its size does not
    /// match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != buffer_len(width, height) {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a raster with every pixel set to `rgb`.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(buffer_len(width, height))
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Builds a raster from a buffer the caller sized from `width` and `height`.
    pub(super) fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), buffer_len(width, height));
        Self {
            data,
            width,
            height,
        }
    }

    /// Creates an all-black raster.
    pub fn zeroed(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; buffer_len(width, height)],
            width,
            height,
        }
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

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the interleaved pixel bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        Some([self.data[offset], self.data[offset + 1], self.data[offset + 2]])
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Rotates the image by 180 degrees without allocating.
    pub(crate) fn flip_both_in_place(&mut self) {
        self.data.reverse();
        for px in self.data.chunks_exact_mut(CHANNELS) {
            px.reverse();
        }
    }

    /// Transposes the image, then mirrors it left to right.
    ///
    /// Net effect is a 90 degree clockwise rotation; the result has
    /// swapped dimensions.
    pub(crate) fn transpose_flip(&self) -> RgbRaster {
        let src_w = self.width as usize;
        let src_h = self.height as usize;
        // Output is src_h wide and src_w tall.
        let mut out = vec![0u8; self.data.len()];
        if out.is_empty() {
            return RgbRaster {
                data: out,
                width: self.height,
                height: self.width,
            };
        }

        for (y, out_row) in out.chunks_exact_mut(src_h * CHANNELS).enumerate() {
            for (x, px) in out_row.chunks_exact_mut(CHANNELS).enumerate() {
                let src = ((src_h - 1 - x) * src_w + y) * CHANNELS;
                px.copy_from_slice(&self.data[src..src + CHANNELS]);
            }
        }

        RgbRaster {
            data: out,
            width: self.height,
            height: self.width,
        }
    }
}

impl std::fmt::Debug for RgbRaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbRaster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Motion-difference image handed to the renderer.
///
/// Same layout as [`RgbRaster`]; each byte is the absolute change of that
/// channel since the previous frame.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DiffRaster(RgbRaster);

impl DiffRaster {
    pub(crate) fn new(raster: RgbRaster) -> Self {
        Self(raster)
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.0.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.0.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    /// Returns the interleaved difference bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.0.data
    }

    /// Returns true if no channel changed.
    pub fn is_blank(&self) -> bool {
        self.0.data.iter().all(|&v| v == 0)
    }
}

#[inline]
fn buffer_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize) * CHANNELS
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Raster where every channel of pixel (x, y) encodes its position.
    fn indexed(width: u32, height: u32) -> RgbRaster {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = (y * width + x) as u8;
                data.extend_from_slice(&[v, v.wrapping_add(100), v.wrapping_add(200)]);
            }
        }
        RgbRaster::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn test_from_raw_checks_size() {
        assert!(RgbRaster::from_raw(2, 2, vec![0; 12]).is_some());
        assert!(RgbRaster::from_raw(2, 2, vec![0; 11]).is_none());
    }

    #[test]
    fn test_from_parts_keeps_buffer() {
        let data: Vec<u8> = (0..18).collect();
        let raster = RgbRaster::from_parts(3, 2, data.clone());
        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.data(), &data[..]);
        assert_eq!(raster.pixel(2, 1), Some([15, 16, 17]));
    }

    #[test]
    fn test_filled() {
        let raster = RgbRaster::filled(3, 2, [1, 2, 3]);
        assert_eq!(raster.data().len(), 18);
        assert_eq!(raster.pixel(2, 1), Some([1, 2, 3]));
        assert_eq!(raster.pixel(3, 0), None);
    }

    #[test]
    fn test_flip_both_in_place() {
        let mut raster = indexed(3, 2);
        raster.flip_both_in_place();

        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.pixel(0, 0), indexed(3, 2).pixel(2, 1));
        assert_eq!(raster.pixel(2, 1), indexed(3, 2).pixel(0, 0));
        assert_eq!(raster.pixel(1, 0), indexed(3, 2).pixel(1, 1));
    }

    #[test]
    fn test_transpose_flip_rotates_clockwise() {
        let src = indexed(3, 2);
        let out = src.transpose_flip();

        assert_eq!(out.dimensions(), (2, 3));
        // Bottom-left of the source becomes top-left.
        assert_eq!(out.pixel(0, 0), src.pixel(0, 1));
        assert_eq!(out.pixel(1, 0), src.pixel(0, 0));
        assert_eq!(out.pixel(0, 2), src.pixel(2, 1));
        assert_eq!(out.pixel(1, 2), src.pixel(2, 0));
    }

    #[test]
    fn test_diff_raster_blank() {
        let diff = DiffRaster::new(RgbRaster::zeroed(2, 2));
        assert!(diff.is_blank());
        assert_eq!(diff.dimensions(), (2, 2));

        let diff = DiffRaster::new(RgbRaster::filled(2, 2, [0, 1, 0]));
        assert!(!diff.is_blank());
    }
}
