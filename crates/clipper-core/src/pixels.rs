// Author: Dustin Pilgrim
// License: MIT

use crate::error::{ClipError, Result};
use crate::rect::Rect;

/// Owned, tightly packed, interleaved 8-bit image.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuf {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuf")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .finish()
    }
}

impl PixelBuf {
    /// Zero-filled buffer.
    pub fn new(width: u32, height: u32, channels: usize) -> Self {
        let len = width as usize * height as usize * channels;
        Self {
            width,
            height,
            channels,
            data: vec![0; len],
        }
    }

    pub fn from_raw(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels;
        if data.len() != expected || channels == 0 {
            return Err(ClipError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.width as usize * self.channels
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride() + x as usize * self.channels
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let o = self.offset(x, y);
        &self.data[o..o + self.channels]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let o = self.offset(x, y);
        let ch = self.channels;
        &mut self.data[o..o + ch]
    }

    /// Writes `colour` at `(x, y)` if inside; extra colour components are
    /// ignored and missing ones repeat the last given value.
    pub fn put(&mut self, x: i64, y: i64, colour: &[u8]) {
        if !self.in_bounds(x, y) || colour.is_empty() {
            return;
        }
        let px = self.pixel_mut(x as u32, y as u32);
        for (ch, v) in px.iter_mut().enumerate() {
            *v = colour[ch.min(colour.len() - 1)];
        }
    }

    /// Copies all channels of `src(sx, sy)` into `self(dx, dy)`.
    pub fn copy_pixel_from(&mut self, dx: u32, dy: u32, src: &PixelBuf, sx: u32, sy: u32) {
        let s = src.offset(sx, sy);
        let d = self.offset(dx, dy);
        let ch = self.channels.min(src.channels);
        self.data[d..d + ch].copy_from_slice(&src.data[s..s + ch]);
    }

    /// Row-by-row block copy of `rect`. Caller guarantees `rect` is inside.
    pub fn sub_block(&self, rect: Rect) -> PixelBuf {
        let mut out = PixelBuf::new(rect.w as u32, rect.h as u32, self.channels);
        let row_len = out.stride();
        for row in 0..rect.h as u32 {
            let s = self.offset(rect.x as u32, rect.y as u32 + row);
            let d = row as usize * row_len;
            out.data[d..d + row_len].copy_from_slice(&self.data[s..s + row_len]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: u32, h: u32) -> PixelBuf {
        let data = (0..w * h * 3).map(|v| (v % 251) as u8).collect();
        PixelBuf::from_raw(w, h, 3, data).unwrap()
    }

    #[test]
    fn from_raw_checks_length() {
        let err = PixelBuf::from_raw(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, ClipError::BufferSize { expected: 12, actual: 11 }));
    }

    #[test]
    fn sub_block_matches_pixels() {
        let img = ramp(8, 6);
        let block = img.sub_block(Rect::new(2, 1, 3, 4));
        assert_eq!((block.width(), block.height()), (3, 4));
        for y in 0..4 {
            for x in 0..3 {
                assert_eq!(block.pixel(x, y), img.pixel(x + 2, y + 1));
            }
        }
    }

    #[test]
    fn put_ignores_out_of_bounds() {
        let mut img = PixelBuf::new(2, 2, 3);
        img.put(-1, 0, &[9, 9, 9]);
        img.put(2, 1, &[9, 9, 9]);
        assert!(img.as_bytes().iter().all(|&b| b == 0));
        img.put(1, 1, &[255]);
        assert_eq!(img.pixel(1, 1), &[255, 255, 255]);
    }
}
