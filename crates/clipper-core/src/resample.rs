// Author: Dustin Pilgrim
// License: MIT
//
// Crop a rotated and/or sheared region out of a source image.
//
// Three tiers:
// - no rotation, no shear, fully inside: plain block copy
// - rotation only: per-pixel rotation about the region origin
// - shear (with or without rotation): per-pixel unit-square affine map
//
// Destination pixels whose source falls outside the image stay zero.

use crate::affine::Affine;
use crate::error::{ClipError, Result};
use crate::pixels::PixelBuf;
use crate::region::OrientedRegion;

/// Resample `region` of `src` into a buffer of the region's unrotated size.
pub fn resample(src: &PixelBuf, region: &OrientedRegion) -> Result<PixelBuf> {
    let oriented = region.oriented();
    let rect = oriented.to_rect();
    if !rect.has_area() {
        return Err(ClipError::AffineSingular);
    }

    let angle = region.normalized_rotation();
    let (w, h) = (rect.w as u32, rect.h as u32);

    if region.shear.is_zero() {
        if angle == 0.0 && rect.fits_within(src.width(), src.height()) {
            return Ok(src.sub_block(rect));
        }

        let rot = Affine::rotation_about(rect.x as f64, rect.y as f64, angle as f64);
        return Ok(sample_with(src, w, h, |x, y| rot.apply_rounded(x as f64, y as f64)));
    }

    let oriented = crate::region::OrientedRect { angle, ..oriented };
    let aff = Affine::from_region(&oriented, region.shear)?;
    let (fw, fh) = (oriented.width as f64, oriented.height as f64);

    Ok(sample_with(src, w, h, |x, y| {
        aff.apply_rounded(x as f64 / fw, y as f64 / fh)
    }))
}

fn sample_with<F>(src: &PixelBuf, w: u32, h: u32, map: F) -> PixelBuf
where
    F: Fn(u32, u32) -> (i64, i64),
{
    let mut dst = PixelBuf::new(w, h, src.channels());
    for y in 0..h {
        for x in 0..w {
            let (xp, yp) = map(x, y);
            if !src.in_bounds(xp, yp) {
                continue;
            }
            dst.copy_pixel_from(x, y, src, xp as u32, yp as u32);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::Rect;
    use crate::region::{OrientedRect, Shear};

    fn gradient(w: u32, h: u32, channels: usize) -> PixelBuf {
        let mut data = Vec::with_capacity((w * h) as usize * channels);
        for y in 0..h {
            for x in 0..w {
                for ch in 0..channels {
                    data.push(((x * 7 + y * 13 + ch as u32 * 29) % 256) as u8);
                }
            }
        }
        PixelBuf::from_raw(w, h, channels, data).unwrap()
    }

    fn region(rect: Rect, rotation: f32, shear: Shear) -> OrientedRegion {
        OrientedRegion {
            rect,
            rotation,
            shear,
            marker: None,
        }
    }

    #[test]
    fn unrotated_inside_is_a_block_copy() {
        let src = gradient(32, 24, 3);
        let rect = Rect::new(4, 5, 10, 8);
        let out = resample(&src, &region(rect, 0.0, Shear::default())).unwrap();
        assert_eq!(out, src.sub_block(rect));
    }

    #[test]
    fn full_turn_matches_unrotated() {
        let src = gradient(32, 24, 3);
        let rect = Rect::new(3, 2, 12, 9);
        let a = resample(&src, &region(rect, 0.0, Shear::default())).unwrap();
        let b = resample(&src, &region(rect, 360.0, Shear::default())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn partially_outside_leaves_zeros() {
        let src = gradient(10, 10, 1);
        let out = resample(&src, &region(Rect::new(-2, 0, 4, 1), 0.0, Shear::default())).unwrap();
        assert_eq!(out.pixel(0, 0), &[0]);
        assert_eq!(out.pixel(1, 0), &[0]);
        assert_eq!(out.pixel(2, 0), src.pixel(0, 0));
        assert_eq!(out.pixel(3, 0), src.pixel(1, 0));
    }

    #[test]
    fn half_turn_walks_backwards() {
        let src = gradient(20, 20, 3);
        let out = resample(&src, &region(Rect::new(10, 10, 3, 3), 180.0, Shear::default())).unwrap();
        // 180 degrees about (10, 10): dest (x, y) reads source (10 - x, 10 - y)
        assert_eq!(out.pixel(0, 0), src.pixel(10, 10));
        assert_eq!(out.pixel(2, 1), src.pixel(8, 9));
    }

    #[test]
    fn shear_offsets_rows() {
        let src = gradient(40, 40, 3);
        let out = resample(&src, &region(Rect::new(5, 5, 10, 10), 0.0, Shear::new(10, 0))).unwrap();
        // row y reads source x + y (shx / h == 1 per row)
        assert_eq!(out.pixel(0, 0), src.pixel(5, 5));
        assert_eq!(out.pixel(0, 4), src.pixel(9, 9));
        assert_eq!(out.pixel(3, 2), src.pixel(10, 7));
    }

    #[test]
    fn output_has_region_size_and_channels() {
        let src = gradient(16, 16, 4);
        let out = resample(&src, &region(Rect::new(1, 1, 7, 5), 30.0, Shear::new(1, 2))).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (7, 5, 4));
    }

    #[test]
    fn rotated_shear_reads_through_unit_square() {
        let src = gradient(48, 48, 3);
        let rect = Rect::new(18, 20, 8, 6);
        let shear = Shear::new(2, 1);
        let out = resample(&src, &region(rect, 30.0, shear)).unwrap();

        let oriented = OrientedRect::from_rect(rect, 30.0);
        let aff = Affine::from_region(&oriented, shear).unwrap();
        for (x, y) in [(0, 0), (3, 2), (7, 5), (5, 1)] {
            let (xp, yp) = aff.apply_rounded(x as f64 / 8.0, y as f64 / 6.0);
            assert!(src.in_bounds(xp, yp));
            assert_eq!(out.pixel(x, y), src.pixel(xp as u32, yp as u32), "at ({x}, {y})");
        }
        assert_eq!(out.pixel(0, 0), src.pixel(18, 20));
    }

    #[test]
    fn empty_region_is_rejected() {
        let src = gradient(8, 8, 3);
        let err = resample(&src, &region(Rect::new(0, 0, 0, 4), 0.0, Shear::default()));
        assert!(matches!(err, Err(ClipError::AffineSingular)));
    }
}
