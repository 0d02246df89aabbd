// Author: Dustin Pilgrim
// License: MIT

use crate::rect::Rect;
use crate::region::OrientedRegion;

/// What a pointer or key edit did to the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing visible changed.
    Ignored,
    /// Rectangle, rotation or shear changed; redraw the outline.
    RegionChanged,
    /// Marker geometry changed; the derived rectangle must be regrown.
    MarkerChanged,
}

/// Edges currently held by a resize drag.
///
/// At most one of `left`/`right` and one of `top`/`bottom` is set; holding
/// one of each is a corner drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

/// Flips a negative width or height back to positive by moving the origin,
/// and swaps the matching edge flags so the drag keeps holding the edge
/// under the pointer.
pub fn normalize(rect: &mut Rect, edges: &mut Edges) {
    if rect.w < 0 {
        rect.x += rect.w;
        rect.w = -rect.w;
        std::mem::swap(&mut edges.left, &mut edges.right);
    }
    if rect.h < 0 {
        rect.y += rect.h;
        rect.h = -rect.h;
        std::mem::swap(&mut edges.top, &mut edges.bottom);
    }
}

/// One resize step: moves the held edges by the pointer delta, then
/// normalizes.
pub fn drag_edges(rect: &mut Rect, edges: &mut Edges, dx: i32, dy: i32) {
    if edges.left {
        rect.x += dx;
        rect.w -= dx;
    } else if edges.right {
        rect.w += dx;
    }
    if edges.top {
        rect.y += dy;
        rect.h -= dy;
    } else if edges.bottom {
        rect.h += dy;
    }
    normalize(rect, edges);
}

/// The two editing profiles. Rectangle edits touch the rectangle directly;
/// marker edits touch the seed circle and leave the rectangle to be regrown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionEditor {
    RectangleEdit,
    MarkerEdit,
}

impl RegionEditor {
    pub fn for_region(region: &OrientedRegion) -> Self {
        if region.marker_active() {
            RegionEditor::MarkerEdit
        } else {
            RegionEditor::RectangleEdit
        }
    }

    /// Moves the rectangle origin or the marker centre.
    pub fn translate(self, region: &mut OrientedRegion, dx: i32, dy: i32) -> Outcome {
        match (self, region.marker.as_mut()) {
            (RegionEditor::MarkerEdit, Some(marker)) => {
                marker.center.x += dx;
                marker.center.y += dy;
                Outcome::MarkerChanged
            }
            _ => {
                region.rect.x += dx;
                region.rect.y += dy;
                Outcome::RegionChanged
            }
        }
    }

    /// Grows or shrinks width/height, floored at zero. For a marker the
    /// two deltas both act on the radius.
    pub fn resize(self, region: &mut OrientedRegion, dw: i32, dh: i32) -> Outcome {
        match (self, region.marker.as_mut()) {
            (RegionEditor::MarkerEdit, Some(marker)) => {
                marker.radius = (marker.radius + dw + dh).max(0);
                Outcome::MarkerChanged
            }
            _ => {
                region.rect.w = (region.rect.w + dw).max(0);
                region.rect.h = (region.rect.h + dh).max(0);
                Outcome::RegionChanged
            }
        }
    }

    /// Grows (`step > 0`) or shrinks (`step < 0`) on all four sides at once,
    /// kept inside `bounds`. For a marker the radius changes by `step`.
    pub fn inflate(self, region: &mut OrientedRegion, step: i32, bounds: Rect) -> Outcome {
        if let (RegionEditor::MarkerEdit, Some(marker)) = (self, region.marker.as_mut()) {
            marker.radius = (marker.radius + step).max(0);
            return Outcome::MarkerChanged;
        }

        let r = &mut region.rect;
        if step > 0 {
            let (x, w) = grow_span(r.x, r.w, bounds.x, bounds.right());
            let (y, h) = grow_span(r.y, r.h, bounds.y, bounds.bottom());
            *r = Rect::new(x, y, w, h);
        } else if step < 0 {
            r.x = (r.x + 1).min(bounds.right());
            r.w = (r.w - 2).max(0);
            r.y = (r.y + 1).min(bounds.bottom());
            r.h = (r.h - 2).max(0);
        }
        Outcome::RegionChanged
    }
}

// one pixel out on each side, never past `lo`/`hi` and never smaller
fn grow_span(pos: i32, len: i32, lo: i32, hi: i32) -> (i32, i32) {
    let pos2 = (pos - 1).max(lo);
    let len2 = (len + 2).min((hi - pos2).max(len));
    (pos2, len2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::Point;
    use crate::region::Marker;

    #[test]
    fn flip_swaps_held_edge() {
        let mut rect = Rect::new(10, 10, 20, 20);
        let mut edges = Edges {
            right: true,
            ..Edges::default()
        };
        drag_edges(&mut rect, &mut edges, -25, 0);
        assert_eq!(rect, Rect::new(5, 10, 5, 20));
        assert!(edges.left && !edges.right);

        // continuing left now moves the left edge
        drag_edges(&mut rect, &mut edges, -5, 0);
        assert_eq!(rect, Rect::new(0, 10, 10, 20));
    }

    #[test]
    fn random_drags_never_go_negative() {
        let mut rect = Rect::new(40, 40, 10, 10);
        let mut edges = Edges {
            left: true,
            bottom: true,
            ..Edges::default()
        };
        let mut seed = 7u32;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let dx = (seed >> 16) as i32 % 41 - 20;
            let dy = (seed >> 8) as i32 % 41 - 20;
            drag_edges(&mut rect, &mut edges, dx, dy);
            assert!(rect.w >= 0 && rect.h >= 0, "{rect:?}");
            assert!(edges.left != edges.right);
            assert!(edges.top != edges.bottom);
        }
    }

    #[test]
    fn inflate_at_origin_stays_on_canvas() {
        let bounds = Rect::new(0, 0, 100, 80);
        let mut region = OrientedRegion::from_rect(Rect::new(0, 0, 10, 10));
        RegionEditor::RectangleEdit.inflate(&mut region, 1, bounds);
        assert!(region.rect.x >= 0 && region.rect.y >= 0);
        assert_eq!(region.rect, Rect::new(0, 0, 12, 12));

        let mut full = OrientedRegion::from_rect(bounds);
        RegionEditor::RectangleEdit.inflate(&mut full, 1, bounds);
        assert_eq!(full.rect, bounds);
    }

    #[test]
    fn shrink_floors_at_zero() {
        let bounds = Rect::new(0, 0, 10, 10);
        let mut region = OrientedRegion::from_rect(Rect::new(9, 9, 1, 1));
        RegionEditor::RectangleEdit.inflate(&mut region, -1, bounds);
        assert_eq!(region.rect, Rect::new(10, 10, 0, 0));

        assert_eq!(
            RegionEditor::RectangleEdit.resize(&mut region, -1, -1),
            Outcome::RegionChanged
        );
        assert_eq!(region.rect.w, 0);
    }

    #[test]
    fn marker_profile_edits_the_circle() {
        let mut region = OrientedRegion {
            rect: Rect::new(1, 2, 3, 4),
            marker: Some(Marker::new(Point::new(20, 20), 1)),
            ..OrientedRegion::default()
        };
        let ed = RegionEditor::for_region(&region);
        assert_eq!(ed, RegionEditor::MarkerEdit);

        assert_eq!(ed.translate(&mut region, 3, -2), Outcome::MarkerChanged);
        assert_eq!(ed.resize(&mut region, -1, 0), Outcome::MarkerChanged);
        assert_eq!(ed.resize(&mut region, 0, -1), Outcome::MarkerChanged);
        assert_eq!(region.marker, Some(Marker::new(Point::new(23, 18), 0)));
        assert_eq!(region.rect, Rect::new(1, 2, 3, 4));
    }
}
