// Author: Dustin Pilgrim
// License: MIT

use clipper_core::PixelBuf;

/// ARGB8888 drawing target over a mapped shm buffer.
pub struct Canvas<'a> {
    px: &'a mut [u32],
    w: i32,
    h: i32,
}

impl<'a> Canvas<'a> {
    pub fn new(px: &'a mut [u32], w: i32, h: i32) -> Self {
        let w = w.max(0);
        let h = if w == 0 { 0 } else { h.clamp(0, px.len() as i32 / w) };
        Self { px, w, h }
    }

    /// Reinterprets raw shm bytes as ARGB words.
    pub fn from_bytes(buf: &'a mut [u8], w: i32, h: i32) -> Self {
        let (_, body, _) = unsafe { buf.align_to_mut::<u32>() };
        Self::new(body, w, h)
    }

    pub fn fill(&mut self, argb: u32) {
        let n = (self.w * self.h) as usize;
        self.px[..n].fill(argb);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, rw: i32, rh: i32, argb: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + rw).min(self.w);
        let y1 = (y + rh).min(self.h);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        for yy in y0..y1 {
            let row = (yy * self.w) as usize;
            self.px[row + x0 as usize..row + x1 as usize].fill(argb);
        }
    }

    /// Border of thickness `t` drawn inside `rw` x `rh`.
    pub fn border(&mut self, x: i32, y: i32, rw: i32, rh: i32, t: i32, argb: u32) {
        if rw <= 0 || rh <= 0 || t <= 0 {
            return;
        }
        self.fill_rect(x, y, rw, t, argb);
        self.fill_rect(x, y + rh - t, rw, t, argb);
        self.fill_rect(x, y, t, rh, argb);
        self.fill_rect(x + rw - t, y, t, rh, argb);
    }

    /// Copies `img` to (`x`, `y`), clipped to the canvas.
    pub fn blit(&mut self, img: &PixelBuf, x: i32, y: i32) {
        self.blit_scaled(img, x, y, img.width() as i32, img.height() as i32);
    }

    /// Copies `img` scaled (nearest neighbour) into `dw` x `dh` at (`x`, `y`).
    pub fn blit_scaled(&mut self, img: &PixelBuf, x: i32, y: i32, dw: i32, dh: i32) {
        let (sw, sh) = (img.width() as i64, img.height() as i64);
        if sw == 0 || sh == 0 || dw <= 0 || dh <= 0 {
            return;
        }

        for dy in 0..dh {
            let cy = y + dy;
            if cy < 0 || cy >= self.h {
                continue;
            }
            let sy = (dy as i64 * sh / dh as i64) as u32;
            let row = (cy * self.w) as usize;

            for dx in 0..dw {
                let cx = x + dx;
                if cx < 0 || cx >= self.w {
                    continue;
                }
                let sx = (dx as i64 * sw / dw as i64) as u32;
                self.px[row + cx as usize] = to_argb(img.pixel(sx, sy));
            }
        }
    }
}

pub fn to_argb(p: &[u8]) -> u32 {
    let (r, g, b) = match *p {
        [v] | [v, _] => (v, v, v),
        [r, g, b, ..] => (r, g, b),
        [] => (0, 0, 0),
    };
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}
