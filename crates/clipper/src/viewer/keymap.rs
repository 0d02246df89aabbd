// Author: Dustin Pilgrim
// License: MIT
//
// evdev key codes (wl_keyboard::key) to the editor's single-character codes.
// Only keys the editor binds are translated.

use clipper_core::keys::{KEY_DOWN, KEY_ESC, KEY_LEFT, KEY_RIGHT, KEY_SPACE, KEY_UP};

const KEY_ESCAPE: u32 = 1;
const KEY_COMMA: u32 = 51;
const KEY_DOT: u32 = 52;
const KEY_SPACEBAR: u32 = 57;
const KEY_ARROW_UP: u32 = 103;
const KEY_ARROW_LEFT: u32 = 105;
const KEY_ARROW_RIGHT: u32 = 106;
const KEY_ARROW_DOWN: u32 = 108;

// evdev rows: QWERTYUIOP, ASDFGHJKL, ZXCVBNM
const ROW_Q: (u32, &str) = (16, "qwertyuiop");
const ROW_A: (u32, &str) = (30, "asdfghjkl");
const ROW_Z: (u32, &str) = (44, "zxcvbnm");

pub fn translate(key: u32, shift: bool) -> Option<char> {
    let c = match key {
        KEY_ESCAPE => KEY_ESC,
        KEY_SPACEBAR => KEY_SPACE,
        KEY_COMMA => ',',
        KEY_DOT => '.',
        KEY_ARROW_UP => KEY_UP,
        KEY_ARROW_LEFT => KEY_LEFT,
        KEY_ARROW_RIGHT => KEY_RIGHT,
        KEY_ARROW_DOWN => KEY_DOWN,
        _ => {
            let letter = letter(key)?;
            return Some(if shift { letter.to_ascii_uppercase() } else { letter });
        }
    };
    Some(c)
}

fn letter(key: u32) -> Option<char> {
    [ROW_Q, ROW_A, ROW_Z].into_iter().find_map(|(first, row)| {
        let i = key.checked_sub(first)? as usize;
        row.chars().nth(i)
    })
}
