// Author: Dustin Pilgrim
// License: MIT

use crate::editor::{Outcome, RegionEditor};
use crate::rect::Rect;
use crate::region::OrientedRegion;

pub const KEY_ESC: char = '\u{1b}';
pub const KEY_SPACE: char = ' ';
pub const KEY_RIGHT: char = '\u{1c}';
pub const KEY_LEFT: char = '\u{1d}';
pub const KEY_UP: char = '\u{1e}';
pub const KEY_DOWN: char = '\u{1f}';

const SMALL: i32 = 1;
const BIG: i32 = 10;

/// Incremental region edit bound to a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyEdit {
    Nudge { dx: i32, dy: i32 },
    Resize { dw: i32, dh: i32 },
    Shear { dx: i32, dy: i32 },
    Rotate(f32),
    Expand,
    Shrink,
    ResetToImage,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Save,
    Forward,
    SaveAndForward,
    Backward,
    Quit,
    Edit(KeyEdit),
}

/// Maps a single-character key code to its command.
pub fn command_for_key(key: char) -> Option<Command> {
    use Command::*;
    use KeyEdit::*;

    let cmd = match key {
        's' => Save,
        'f' => Forward,
        KEY_SPACE => SaveAndForward,
        'b' => Backward,
        'q' | KEY_ESC => Quit,

        'h' | KEY_LEFT => Edit(Nudge { dx: -SMALL, dy: 0 }),
        'j' | KEY_DOWN => Edit(Nudge { dx: 0, dy: SMALL }),
        'k' | KEY_UP => Edit(Nudge { dx: 0, dy: -SMALL }),
        'l' | KEY_RIGHT => Edit(Nudge { dx: SMALL, dy: 0 }),
        'H' => Edit(Nudge { dx: -BIG, dy: 0 }),
        'J' => Edit(Nudge { dx: 0, dy: BIG }),
        'K' => Edit(Nudge { dx: 0, dy: -BIG }),
        'L' => Edit(Nudge { dx: BIG, dy: 0 }),

        'y' => Edit(Resize { dw: -1, dh: 0 }),
        'o' => Edit(Resize { dw: 1, dh: 0 }),
        'i' => Edit(Resize { dw: 0, dh: -1 }),
        'u' => Edit(Resize { dw: 0, dh: 1 }),

        'n' => Edit(Shear { dx: -1, dy: 0 }),
        '.' => Edit(Shear { dx: 1, dy: 0 }),
        ',' => Edit(Shear { dx: 0, dy: -1 }),
        'm' => Edit(Shear { dx: 0, dy: 1 }),

        'R' => Edit(Rotate(1.0)),
        'r' => Edit(Rotate(-1.0)),

        'e' => Edit(Expand),
        'E' => Edit(Shrink),
        'a' => Edit(ResetToImage),

        _ => return None,
    };
    Some(cmd)
}

/// Applies a key edit with the profile matching the region's current form.
/// `image` is the display-space image bounds.
pub fn apply_key_edit(region: &mut OrientedRegion, edit: KeyEdit, image: Rect) -> Outcome {
    let editor = RegionEditor::for_region(region);

    match edit {
        KeyEdit::Nudge { dx, dy } => editor.translate(region, dx, dy),
        KeyEdit::Resize { dw, dh } => editor.resize(region, dw, dh),
        KeyEdit::Expand => editor.inflate(region, 1, image),
        KeyEdit::Shrink => editor.inflate(region, -1, image),

        KeyEdit::Shear { dx, dy } => {
            region.shear.x += dx;
            region.shear.y += dy;
            refresh(editor)
        }
        KeyEdit::Rotate(deg) => {
            region.rotate_by(deg);
            refresh(editor)
        }

        KeyEdit::ResetToImage => {
            region.clear_transform();
            region.rect = image;
            Outcome::RegionChanged
        }
    }
}

// shear/rotation do not touch the marker, but its overlay is redrawn too
fn refresh(editor: RegionEditor) -> Outcome {
    match editor {
        RegionEditor::MarkerEdit => Outcome::MarkerChanged,
        RegionEditor::RectangleEdit => Outcome::RegionChanged,
    }
}
