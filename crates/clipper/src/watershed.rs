// Author: Dustin Pilgrim
// License: MIT
//
// Marker-controlled watershed seeded from a circle.
//
// Labels start as background (1) everywhere, unknown (0) inside 3r and
// foreground (2) inside r. Unknown pixels are flooded in order of local
// colour gradient; a pixel whose labelled neighbours disagree becomes a
// boundary (-1). The grown region's bounds are the bounds of the boundary.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use clipper_core::{Grown, Marker, MarkerGrower, PixelBuf, Rect};

const BACKGROUND: i32 = 1;
const UNKNOWN: i32 = 0;
const FOREGROUND: i32 = 2;
const BOUNDARY: i32 = -1;

const PAINT: [u8; 1] = [255];

#[derive(Debug, Default, Clone, Copy)]
pub struct WatershedGrower;

impl MarkerGrower for WatershedGrower {
    fn grow(&self, image: &PixelBuf, marker: Marker) -> Grown {
        let labels = flood(image, marker);
        let (w, h) = (image.width() as usize, image.height() as usize);

        let mut out = image.clone();
        draw_circle(&mut out, marker);

        let mut min = (usize::MAX, usize::MAX);
        let mut max = (0usize, 0usize);
        let mut found = false;

        // outermost row/column excluded
        for y in 1..h.saturating_sub(1) {
            for x in 1..w.saturating_sub(1) {
                if labels[y * w + x] != BOUNDARY {
                    continue;
                }
                out.put(x as i64, y as i64, &PAINT);
                found = true;
                min = (min.0.min(x), min.1.min(y));
                max = (max.0.max(x), max.1.max(y));
            }
        }

        let bounds = if found {
            Rect::new(
                min.0 as i32,
                min.1 as i32,
                (max.0 - min.0) as i32,
                (max.1 - min.1) as i32,
            )
        } else {
            Rect::default()
        };

        Grown { image: out, bounds }
    }
}

fn seed_labels(w: usize, h: usize, marker: Marker) -> Vec<i32> {
    let (cx, cy) = (marker.center.x as i64, marker.center.y as i64);
    let r = marker.radius.max(0) as i64;
    let (r2, r2_outer) = (r * r, 9 * r * r);

    let mut labels = vec![BACKGROUND; w * h];
    for y in 0..h {
        for x in 0..w {
            let dx = x as i64 - cx;
            let dy = y as i64 - cy;
            let d2 = dx * dx + dy * dy;
            labels[y * w + x] = if d2 <= r2 {
                FOREGROUND
            } else if d2 <= r2_outer {
                UNKNOWN
            } else {
                BACKGROUND
            };
        }
    }
    labels
}

fn flood(image: &PixelBuf, marker: Marker) -> Vec<i32> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut labels = seed_labels(w, h, marker);
    let grad = gradient(image);

    let mut queued = vec![false; w * h];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    let mut push = |heap: &mut BinaryHeap<Reverse<(u8, u64, usize)>>, i: usize| {
        heap.push(Reverse((grad[i], seq, i)));
        seq += 1;
    };

    for i in 0..w * h {
        if labels[i] == UNKNOWN && neighbours(i, w, h).any(|n| labels[n] > 0) {
            queued[i] = true;
            push(&mut heap, i);
        }
    }

    while let Some(Reverse((_, _, i))) = heap.pop() {
        let mut label = UNKNOWN;
        for n in neighbours(i, w, h) {
            let l = labels[n];
            if l <= 0 {
                continue;
            }
            if label == UNKNOWN {
                label = l;
            } else if label != l {
                label = BOUNDARY;
                break;
            }
        }
        labels[i] = label;

        if label <= 0 {
            continue;
        }
        for n in neighbours(i, w, h) {
            if labels[n] == UNKNOWN && !queued[n] {
                queued[n] = true;
                push(&mut heap, n);
            }
        }
    }

    labels
}

/// Largest per-channel difference to any 4-neighbour.
fn gradient(image: &PixelBuf) -> Vec<u8> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut grad = vec![0u8; w * h];

    for i in 0..w * h {
        let (x, y) = ((i % w) as u32, (i / w) as u32);
        let p = image.pixel(x, y);
        let mut g = 0u8;
        for n in neighbours(i, w, h) {
            let q = image.pixel((n % w) as u32, (n / w) as u32);
            for (a, b) in p.iter().zip(q) {
                g = g.max(a.abs_diff(*b));
            }
        }
        grad[i] = g;
    }
    grad
}

fn neighbours(i: usize, w: usize, h: usize) -> impl Iterator<Item = usize> {
    let (x, y) = (i % w, i / w);
    let left = (x > 0).then(|| i - 1);
    let right = (x + 1 < w).then(|| i + 1);
    let up = (y > 0).then(|| i - w);
    let down = (y + 1 < h).then(|| i + w);
    [left, right, up, down].into_iter().flatten()
}

// two pixel wide ring on the seed radius
fn draw_circle(img: &mut PixelBuf, marker: Marker) {
    let r = marker.radius.max(0) as f64;
    let (cx, cy) = (marker.center.x as i64, marker.center.y as i64);
    let reach = r as i64 + 2;

    for y in cy - reach..=cy + reach {
        for x in cx - reach..=cx + reach {
            let d = (((x - cx).pow(2) + (y - cy).pow(2)) as f64).sqrt();
            if (d - r).abs() < 1.0 {
                img.put(x, y, &PAINT);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipper_core::Point;

    /// Dark square of side `side` at (`x0`, `y0`) on a bright field.
    fn square_scene(w: u32, h: u32, x0: u32, y0: u32, side: u32) -> PixelBuf {
        let mut img = PixelBuf::new(w, h, 3);
        for y in 0..h {
            for x in 0..w {
                let inside = (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y);
                let v = if inside { 20 } else { 230 };
                img.put(x as i64, y as i64, &[v, v, v]);
            }
        }
        img
    }

    #[test]
    fn boundary_hugs_the_object() {
        let img = square_scene(64, 64, 20, 20, 20);
        let grown = WatershedGrower.grow(&img, Marker::new(Point::new(30, 30), 5));
        let b = grown.bounds;

        // the split lands on the square's edge, give or take a pixel
        assert!((18..=21).contains(&b.x), "{b:?}");
        assert!((18..=21).contains(&b.y), "{b:?}");
        assert!((38..=42).contains(&b.right()), "{b:?}");
        assert!((38..=42).contains(&b.bottom()), "{b:?}");
    }

    #[test]
    fn boundary_and_circle_are_painted() {
        let img = square_scene(64, 64, 20, 20, 20);
        let marker = Marker::new(Point::new(30, 30), 5);
        let grown = WatershedGrower.grow(&img, marker);
        assert_eq!(grown.image.pixel(35, 30), &[255, 255, 255]);
        assert_eq!(img.pixel(35, 30), &[20, 20, 20]);
    }

    #[test]
    fn zero_radius_has_no_boundary() {
        let img = square_scene(16, 16, 4, 4, 4);
        let grown = WatershedGrower.grow(&img, Marker::new(Point::new(6, 6), 0));
        assert_eq!(grown.bounds, Rect::default());
    }

    #[test]
    fn gradient_is_zero_on_flat_images() {
        let img = PixelBuf::new(5, 4, 3);
        assert!(gradient(&img).iter().all(|&g| g == 0));
    }

    #[test]
    fn neighbours_respect_edges() {
        let corner: Vec<_> = neighbours(0, 3, 3).collect();
        assert_eq!(corner, [1, 3]);
        let centre: Vec<_> = neighbours(4, 3, 3).collect();
        assert_eq!(centre, [3, 5, 1, 7]);
    }
}
