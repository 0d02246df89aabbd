// Author: Dustin Pilgrim
// License: MIT

mod files;
mod video;

use std::path::{Path, PathBuf};

use eventline::info;

use clipper_core::format::is_image_path;
use clipper_core::{ClipError, PixelBuf};

pub use files::FileList;
pub use video::VideoSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Images,
    Video,
}

/// One decoded frame, RGB8 at source resolution.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: PixelBuf,
    /// 1-based position in the sequence.
    pub number: u64,
    /// Image file, or the video file for video frames.
    pub path: PathBuf,
}

/// Steppable sequence of frames. On error the current frame is unchanged.
/// The end of the sequence is `ClipError::SourceUnavailable`; anything
/// else is a decode failure.
pub trait FrameSource {
    fn current(&self) -> &Frame;
    fn forward(&mut self) -> Result<&Frame, ClipError>;
    fn backward(&mut self) -> Result<&Frame, ClipError>;
    fn kind(&self) -> SourceKind;
}

/// Picks a backend for `reference`: a directory or an image file opens a
/// file list, anything else is treated as a video. `start` is 1-based.
pub fn open(reference: &Path, start: Option<u64>) -> Result<Box<dyn FrameSource>, String> {
    if reference.is_dir() {
        let list = FileList::open_dir(reference, start)?;
        info!("{} images in {}", list.len(), reference.display());
        return Ok(Box::new(list));
    }

    if !reference.exists() {
        return Err(format!("{}: no such file or directory", reference.display()));
    }

    if is_image_path(reference) {
        let list = FileList::open_at(reference, start)?;
        info!("{} images next to {}", list.len(), reference.display());
        return Ok(Box::new(list));
    }

    let video = VideoSource::open(reference, start.unwrap_or(1))?;
    Ok(Box::new(video))
}

pub(crate) fn rgb_to_pixels(img: image::RgbImage) -> Result<PixelBuf, ClipError> {
    let (w, h) = img.dimensions();
    PixelBuf::from_raw(w, h, 3, img.into_raw())
}
