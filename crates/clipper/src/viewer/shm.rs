// Author: Dustin Pilgrim
// License: MIT

use std::fs::File;
use std::os::fd::AsFd;

use memmap2::MmapMut;
use tempfile::tempfile;

use wayland_client::QueueHandle;
use wayland_client::protocol::{wl_buffer, wl_shm, wl_shm_pool};

use super::app::App;
use super::canvas::Canvas;

/// One ARGB8888 buffer backed by an anonymous mapped file.
pub struct ShmBuffer {
    _file: File,
    mmap: MmapMut,
    _pool: wl_shm_pool::WlShmPool,
    pub buffer: wl_buffer::WlBuffer,
    pub width: i32,
    pub height: i32,
    pub busy: bool,
}

impl ShmBuffer {
    pub fn new(
        shm: &wl_shm::WlShm,
        qh: &QueueHandle<App>,
        width: i32,
        height: i32,
    ) -> Result<Self, String> {
        let width = width.max(1);
        let height = height.max(1);
        let stride = width * 4;
        let size = stride as u64 * height as u64;

        let file = tempfile().map_err(|e| format!("tempfile: {e}"))?;
        file.set_len(size).map_err(|e| format!("set_len: {e}"))?;

        let mmap = unsafe { MmapMut::map_mut(&file).map_err(|e| format!("mmap: {e}"))? };

        let pool = shm.create_pool(file.as_fd(), size as i32, qh, ());
        let buffer = pool.create_buffer(0, width, height, stride, wl_shm::Format::Argb8888, qh, ());

        Ok(Self {
            _file: file,
            mmap,
            _pool: pool,
            buffer,
            width,
            height,
            busy: false,
        })
    }

    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::from_bytes(&mut self.mmap[..], self.width, self.height)
    }

    pub fn destroy(&self) {
        self.buffer.destroy();
    }
}
