// Author: Dustin Pilgrim
// License: MIT

pub mod affine;
pub mod annotation;
pub mod editor;
pub mod error;
pub mod format;
pub mod gesture;
pub mod keys;
pub mod marker;
pub mod outline;
pub mod pixels;
pub mod rect;
pub mod region;
pub mod resample;
pub mod template;

pub use affine::Affine;
pub use annotation::{ClipAnnotation, parse_clip_name};
pub use editor::{Edges, Outcome, RegionEditor};
pub use error::{ClipError, Result};
pub use gesture::{Button, Gesture, GestureStatus, Modifiers, PointerEvent, PointerKind, handle_pointer};
pub use keys::{Command, KeyEdit, apply_key_edit, command_for_key};
pub use marker::{Grown, MarkerGrower};
pub use outline::{crop_preview, draw_marker_outline, draw_outline};
pub use pixels::PixelBuf;
pub use rect::{Point, Rect};
pub use region::{Marker, OrientedRect, OrientedRegion, Shear};
pub use resample::resample;
pub use template::{TemplateValues, expand};
