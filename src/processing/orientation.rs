//! Display orientation correction.
//!
//! The sensor is mounted rotated relative to the display. Each rotation
//! state maps to one fixed transform so the image is shown upright.

use super::raster::RgbRaster;
use crate::capture::Rotation;

/// Transform applied for a given rotation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// No change.
    Identity,
    /// Flip both axes in place. Dimensions unchanged.
    FlipBoth,
    /// Transpose then mirror horizontally into a new buffer. Dimensions swap.
    TransposeFlip,
}

impl Transform {
    /// Selects the transform for a rotation state.
    ///
    /// `Rot270` only flips while `Rot0` and `Rot180` transpose as well.
    pub fn for_rotation(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Rot90 => Transform::Identity,
            Rotation::Rot270 => Transform::FlipBoth,
            Rotation::Rot0 | Rotation::Rot180 => Transform::TransposeFlip,
        }
    }
}

/// Applies the rotation-dependent transform to decoded frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationCorrector;

impl OrientationCorrector {
    /// Creates a corrector.
    pub fn new() -> Self {
        Self
    }

    /// Returns the raster corrected for `rotation`.
    ///
    /// Flips reuse the input buffer; transposes allocate a new one.
    pub fn correct(&self, mut raster: RgbRaster, rotation: Rotation) -> RgbRaster {
        let transform = Transform::for_rotation(rotation);
        tracing::trace!(?rotation, ?transform, "Correcting orientation");

        match transform {
            Transform::Identity => raster,
            Transform::FlipBoth => {
                raster.flip_both_in_place();
                raster
            }
            Transform::TransposeFlip => raster.transpose_flip(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_raster() -> impl Strategy<Value = RgbRaster> {
        (1u32..9, 1u32..9).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |data| RgbRaster::from_raw(w, h, data).unwrap())
        })
    }

    #[test]
    fn test_transform_table() {
        assert_eq!(Transform::for_rotation(Rotation::Rot0), Transform::TransposeFlip);
        assert_eq!(Transform::for_rotation(Rotation::Rot90), Transform::Identity);
        assert_eq!(Transform::for_rotation(Rotation::Rot180), Transform::TransposeFlip);
        assert_eq!(Transform::for_rotation(Rotation::Rot270), Transform::FlipBoth);
    }

    #[test]
    fn test_rot0_swaps_dimensions() {
        let corrector = OrientationCorrector::new();
        let out = corrector.correct(RgbRaster::zeroed(6, 4), Rotation::Rot0);
        assert_eq!(out.dimensions(), (4, 6));
    }

    #[test]
    fn test_rot180_matches_rot0() {
        let corrector = OrientationCorrector::new();
        let data: Vec<u8> = (0..36).collect();
        let raster = RgbRaster::from_raw(4, 3, data).unwrap();

        let rot0 = corrector.correct(raster.clone(), Rotation::Rot0);
        let rot180 = corrector.correct(raster, Rotation::Rot180);
        assert_eq!(rot0, rot180);
    }

    #[test]
    fn test_rot270_keeps_dimensions() {
        let corrector = OrientationCorrector::new();
        let data: Vec<u8> = (0..36).collect();
        let raster = RgbRaster::from_raw(4, 3, data).unwrap();

        let out = corrector.correct(raster.clone(), Rotation::Rot270);
        assert_eq!(out.dimensions(), (4, 3));
        assert_eq!(out.pixel(0, 0), raster.pixel(3, 2));
        assert_eq!(out.pixel(3, 2), raster.pixel(0, 0));
    }

    proptest! {
        #[test]
        fn prop_rot90_is_identity(raster in arb_raster()) {
            let out = OrientationCorrector::new().correct(raster.clone(), Rotation::Rot90);
            prop_assert_eq!(out, raster);
        }

        #[test]
        fn prop_rot0_twice_restores_dimensions(raster in arb_raster()) {
            let corrector = OrientationCorrector::new();
            let once = corrector.correct(raster.clone(), Rotation::Rot0);
            let twice = corrector.correct(once, Rotation::Rot0);
            prop_assert_eq!(twice.dimensions(), raster.dimensions());
        }

        #[test]
        fn prop_rot0_four_times_is_identity(raster in arb_raster()) {
            let corrector = OrientationCorrector::new();
            let mut out = raster.clone();
            for _ in 0..4 {
                out = corrector.correct(out, Rotation::Rot0);
            }
            prop_assert_eq!(out, raster);
        }

        #[test]
        fn prop_rot270_twice_is_identity(raster in arb_raster()) {
            let corrector = OrientationCorrector::new();
            let once = corrector.correct(raster.clone(), Rotation::Rot270);
            let twice = corrector.correct(once, Rotation::Rot270);
            prop_assert_eq!(twice, raster);
        }
    }
}
