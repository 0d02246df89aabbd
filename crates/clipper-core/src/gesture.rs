// Author: Dustin Pilgrim
// License: MIT
//
// Pointer gesture state machine.
//
// left drag          draw a new rectangle (ctrl: square, alt: from centre)
// shift+left/middle  seed a marker and drag out its radius
// right drag         move or resize the rectangle, or the marker
// any release        back to idle

use crate::editor::{Edges, Outcome, RegionEditor, drag_edges};
use crate::rect::{Point, Rect};
use crate::region::{Marker, OrientedRegion, Shear};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down(Button),
    Up(Button),
    Move,
}

/// One pointer event in display space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Point,
    pub mods: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: i32, y: i32, mods: Modifiers) -> Self {
        Self {
            kind,
            pos: Point::new(x, y),
            mods,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    Idle,
    DrawingNewRegion,
    MovingRegion,
    ResizingRegion(Edges),
    /// Marker just placed; moving drags out the radius.
    SeedingMarker,
    MovingMarker,
    ResizingMarker,
}

/// Ephemeral state of the gesture in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureStatus {
    pub anchor: Point,
    pub gesture: Gesture,
}

impl GestureStatus {
    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Applies one pointer event to the region.
pub fn handle_pointer(
    region: &mut OrientedRegion,
    status: &mut GestureStatus,
    ev: &PointerEvent,
) -> Outcome {
    let p = ev.pos;
    match ev.kind {
        PointerKind::Up(_) => {
            status.reset();
            Outcome::Ignored
        }

        PointerKind::Down(Button::Middle) => seed_marker(region, status, p),
        PointerKind::Down(Button::Left) if ev.mods.shift => seed_marker(region, status, p),

        PointerKind::Down(Button::Left) => {
            status.anchor = p;
            status.gesture = Gesture::DrawingNewRegion;
            Outcome::Ignored
        }

        PointerKind::Down(Button::Right) => {
            status.anchor = p;
            match classify_grab(region, p) {
                Some(gesture) => {
                    status.gesture = gesture;
                    Outcome::Ignored
                }
                None => {
                    // grabbed outside the marker ring: drop it, fall back to the rectangle
                    region.marker = None;
                    status.gesture = classify_rect_grab(region.rect, p);
                    Outcome::RegionChanged
                }
            }
        }

        PointerKind::Move => on_move(region, status, p, ev.mods),
    }
}

fn seed_marker(region: &mut OrientedRegion, status: &mut GestureStatus, p: Point) -> Outcome {
    status.anchor = p;
    status.gesture = Gesture::SeedingMarker;
    region.marker = Some(Marker::new(p, 0));
    Outcome::MarkerChanged
}

fn on_move(region: &mut OrientedRegion, status: &mut GestureStatus, p: Point, mods: Modifiers) -> Outcome {
    let dx = p.x - status.anchor.x;
    let dy = p.y - status.anchor.y;

    match status.gesture {
        Gesture::Idle => Outcome::Ignored,

        Gesture::DrawingNewRegion => {
            region.rect = drawn_rect(status.anchor, p, mods);
            region.clear_transform();
            Outcome::RegionChanged
        }

        Gesture::SeedingMarker => {
            region.rotation = 0.0;
            region.shear = Shear::default();
            set_radius_to(region, p)
        }

        Gesture::ResizingMarker => set_radius_to(region, p),

        Gesture::MovingMarker => {
            status.anchor = p;
            RegionEditor::MarkerEdit.translate(region, dx, dy)
        }

        Gesture::MovingRegion => {
            status.anchor = p;
            RegionEditor::RectangleEdit.translate(region, dx, dy)
        }

        Gesture::ResizingRegion(mut edges) => {
            drag_edges(&mut region.rect, &mut edges, dx, dy);
            status.gesture = Gesture::ResizingRegion(edges);
            status.anchor = p;
            Outcome::RegionChanged
        }
    }
}

fn set_radius_to(region: &mut OrientedRegion, p: Point) -> Outcome {
    match region.marker.as_mut() {
        Some(marker) => {
            marker.radius = marker.center.distance(p) as i32;
            Outcome::MarkerChanged
        }
        None => Outcome::Ignored,
    }
}

/// Rectangle spanned by a left drag from `anchor` to `cur`.
pub fn drawn_rect(anchor: Point, cur: Point, mods: Modifiers) -> Rect {
    let mut r = if mods.ctrl {
        let side = (cur.x - anchor.x).abs().max((cur.y - anchor.y).abs());
        Rect::new(
            if cur.x > anchor.x { anchor.x } else { anchor.x - side },
            if cur.y > anchor.y { anchor.y } else { anchor.y - side },
            side,
            side,
        )
    } else {
        Rect::spanning(anchor, cur)
    };

    if mods.alt {
        // anchor is the centre: mirror the box across it
        if cur.x > anchor.x {
            r.x -= r.w;
        }
        if cur.y > anchor.y {
            r.y -= r.h;
        }
        r.w *= 2;
        r.h *= 2;
    }
    r
}

/// Right-button grab. `None` means a marker is active but the pointer is
/// outside its ring.
fn classify_grab(region: &OrientedRegion, p: Point) -> Option<Gesture> {
    match region.marker {
        Some(marker) => classify_marker_grab(marker.center.distance(p), marker.radius),
        None => Some(classify_rect_grab(region.rect, p)),
    }
}

/// Ring band test for a marker grab at distance `dist` from the centre.
///
/// The outermost pixel of the disc, `radius - 0.5 < dist <= radius`,
/// resizes; anything further in moves.
pub fn classify_marker_grab(dist: f64, radius: i32) -> Option<Gesture> {
    let r = radius as f64;
    if dist > r {
        None
    } else if dist > r - 0.5 {
        Some(Gesture::ResizingMarker)
    } else {
        Some(Gesture::MovingMarker)
    }
}

/// Strict interior moves. Otherwise the pointer's side of each axis picks
/// the held edges; on-border counts as outside.
pub fn classify_rect_grab(rect: Rect, p: Point) -> Gesture {
    if rect.contains_interior(p.x, p.y) {
        return Gesture::MovingRegion;
    }

    let mut edges = Edges::default();
    if p.x <= rect.x {
        edges.left = true;
    } else if p.x >= rect.right() {
        edges.right = true;
    }
    if p.y <= rect.y {
        edges.top = true;
    } else if p.y >= rect.bottom() {
        edges.bottom = true;
    }
    Gesture::ResizingRegion(edges)
}
