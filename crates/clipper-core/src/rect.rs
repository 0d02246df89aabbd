// Author: Dustin Pilgrim
// License: MIT

/// Integer pixel position. May be negative while dragging off-canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Box spanning two corner points, in any order.
    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn has_area(&self) -> bool {
        self.w > 0 && self.h > 0
    }

    /// Strict interior test: points on the border are not inside.
    pub fn contains_interior(&self, px: i32, py: i32) -> bool {
        self.x < px && px < self.right() && self.y < py && py < self.bottom()
    }

    /// True when the whole rectangle lies within a `width` x `height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.right() as i64 <= width as i64
            && self.bottom() as i64 <= height as i64
    }

    /// Multiply every field by `factor`, rounding to the nearest pixel.
    pub fn scaled(&self, factor: f32) -> Self {
        let f = factor as f64;
        Self {
            x: (self.x as f64 * f).round() as i32,
            y: (self.y as f64 * f).round() as i32,
            w: (self.w as f64 * f).round() as i32,
            h: (self.h as f64 * f).round() as i32,
        }
    }
}
