// Author: Dustin Pilgrim
// License: MIT

use crate::affine::Affine;
use crate::error::Result;
use crate::marker::MarkerGrower;
use crate::pixels::PixelBuf;
use crate::rect::Rect;
use crate::region::{Marker, OrientedRect, OrientedRegion};
use crate::resample::resample;

pub const DEFAULT_OUTLINE: [u8; 3] = [255, 255, 0];

/// Copy of `display` with the region boundary drawn on it.
///
/// Only the four edges are sampled: one pass sweeps x along the first and
/// last row, another sweeps y along the first and last column. Each sample
/// goes through the same mapping the resampler uses.
pub fn draw_outline(display: &PixelBuf, region: &OrientedRegion, colour: &[u8]) -> PixelBuf {
    let mut out = display.clone();
    let oriented = region.oriented();
    let rect = oriented.to_rect();
    if !rect.has_area() {
        return out;
    }

    let angle = region.normalized_rotation();

    if angle == 0.0 && region.shear.is_zero() {
        draw_rect(&mut out, rect, colour);
        return out;
    }

    if region.shear.is_zero() {
        let rot = Affine::rotation_about(rect.x as f64, rect.y as f64, angle as f64);
        sweep_edges(&mut out, rect, colour, |x, y| rot.apply_rounded(x as f64, y as f64));
        return out;
    }

    let oriented = OrientedRect { angle, ..oriented };
    let Ok(aff) = Affine::from_region(&oriented, region.shear) else {
        return out;
    };
    let (fw, fh) = (oriented.width as f64, oriented.height as f64);
    sweep_edges(&mut out, rect, colour, |x, y| {
        aff.apply_rounded(x as f64 / fw, y as f64 / fh)
    });
    out
}

/// Axis-aligned one-pixel outline covering `rect.x ..= rect.right() - 1`.
pub fn draw_rect(img: &mut PixelBuf, rect: Rect, colour: &[u8]) {
    if !rect.has_area() {
        return;
    }
    let (x0, y0) = (rect.x as i64, rect.y as i64);
    let (x1, y1) = (x0 + rect.w as i64 - 1, y0 + rect.h as i64 - 1);
    for x in x0..=x1 {
        img.put(x, y0, colour);
        img.put(x, y1, colour);
    }
    for y in y0..=y1 {
        img.put(x0, y, colour);
        img.put(x1, y, colour);
    }
}

fn sweep_edges<F>(img: &mut PixelBuf, rect: Rect, colour: &[u8], map: F)
where
    F: Fn(i32, i32) -> (i64, i64),
{
    let last_row = (rect.h - 1).max(0);
    let last_col = (rect.w - 1).max(0);

    for x in 0..rect.w {
        for y in [0, last_row] {
            let (xp, yp) = map(x, y);
            img.put(xp, yp, colour);
        }
    }
    for y in 0..rect.h {
        for x in [0, last_col] {
            let (xp, yp) = map(x, y);
            img.put(xp, yp, colour);
        }
    }
}

/// Runs marker growth on `display`, returning the painted overlay (with the
/// grown bounding box outlined) and the new derived rectangle.
pub fn draw_marker_outline<G>(
    display: &PixelBuf,
    marker: Marker,
    grower: &G,
    colour: &[u8],
) -> (PixelBuf, Rect)
where
    G: MarkerGrower + ?Sized,
{
    let grown = grower.grow(display, marker);
    let mut image = grown.image;
    let b = grown.bounds;
    // bounding box drawn inclusive of its far corner
    if b.has_area() {
        draw_rect(&mut image, Rect::new(b.x, b.y, b.w + 1, b.h + 1), colour);
    }
    (image, grown.bounds)
}

/// Crop for preview/export: display-space region scaled to source space,
/// then resampled from the full-resolution source.
pub fn crop_preview(source: &PixelBuf, region: &OrientedRegion, scale_factor: f32) -> Result<PixelBuf> {
    resample(source, &region.to_source(scale_factor))
}
