// Author: Dustin Pilgrim
// License: MIT

use crate::rect::{Point, Rect};

/// Shear offsets in pixels, applied while resampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shear {
    pub x: i32,
    pub y: i32,
}

impl Shear {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Circular seed for marker growth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marker {
    pub center: Point,
    pub radius: i32,
}

impl Marker {
    pub const fn new(center: Point, radius: i32) -> Self {
        Self { center, radius }
    }
}

/// Float rectangle with a rotation angle in degrees about its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl OrientedRect {
    pub fn from_rect(rect: Rect, angle: f32) -> Self {
        Self {
            x: rect.x as f32,
            y: rect.y as f32,
            width: rect.w as f32,
            height: rect.h as f32,
            angle,
        }
    }

    /// Drops rotation and rounds back to integer pixels.
    pub fn to_rect(&self) -> Rect {
        Rect {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            w: self.width.round() as i32,
            h: self.height.round() as i32,
        }
    }
}

/// The region being edited: a rectangle plus rotation and shear, or a
/// marker whose grown bounds drive the rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientedRegion {
    pub rect: Rect,
    /// Degrees in [0, 360), counter-clockwise about `rect`'s top-left.
    pub rotation: f32,
    pub shear: Shear,
    /// When set, `rect` is the derived output of marker growth.
    pub marker: Option<Marker>,
}

impl OrientedRegion {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    pub fn marker_active(&self) -> bool {
        self.marker.is_some()
    }

    pub fn oriented(&self) -> OrientedRect {
        OrientedRect::from_rect(self.rect, self.rotation)
    }

    /// Rotation folded into [0, 360).
    pub fn normalized_rotation(&self) -> f32 {
        let r = self.rotation.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negatives
        if r >= 360.0 { 0.0 } else { r }
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
        if self.rotation >= 360.0 {
            self.rotation = 0.0;
        }
    }

    /// Converts display-space coordinates to source space. Rotation and
    /// shear are not scaled.
    pub fn to_source(&self, scale_factor: f32) -> OrientedRegion {
        let rect = if scale_factor > 0.0 && scale_factor != 1.0 {
            self.rect.scaled(1.0 / scale_factor)
        } else {
            self.rect
        };
        OrientedRegion { rect, ..*self }
    }

    /// Drop rotation, shear and marker; keep the rectangle.
    pub fn clear_transform(&mut self) {
        self.rotation = 0.0;
        self.shear = Shear::default();
        self.marker = None;
    }
}

/// Axis-aligned bounds of an oriented rectangle, ignoring rotation.
pub fn rect_from_oriented(region: &OrientedRect) -> Rect {
    region.to_rect()
}

pub fn oriented_from_rect(rect: Rect, angle: f32) -> OrientedRect {
    OrientedRect::from_rect(rect, angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oriented_round_trip_keeps_rect() {
        let r = Rect::new(-3, 7, 40, 12);
        let o = oriented_from_rect(r, 33.0);
        assert_eq!(o.angle, 33.0);
        assert_eq!(rect_from_oriented(&o), r);
    }

    #[test]
    fn rotation_wraps_both_ways() {
        let mut region = OrientedRegion::default();
        region.rotate_by(-1.0);
        assert_eq!(region.rotation, 359.0);
        region.rotate_by(1.0);
        assert_eq!(region.rotation, 0.0);
        region.rotation = 360.0;
        assert_eq!(region.normalized_rotation(), 0.0);
    }

    #[test]
    fn to_source_scales_rect_only() {
        let region = OrientedRegion {
            rect: Rect::new(10, 20, 30, 40),
            rotation: 15.0,
            shear: Shear::new(2, -1),
            marker: None,
        };
        let src = region.to_source(0.5);
        assert_eq!(src.rect, Rect::new(20, 40, 60, 80));
        assert_eq!(src.rotation, 15.0);
        assert_eq!(src.shear, Shear::new(2, -1));
    }
}
