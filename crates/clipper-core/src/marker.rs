// Author: Dustin Pilgrim
// License: MIT

use crate::pixels::PixelBuf;
use crate::rect::Rect;
use crate::region::Marker;

/// Result of growing a region from a circular seed.
#[derive(Debug, Clone)]
pub struct Grown {
    /// Copy of the input with the segmentation boundary painted on it.
    pub image: PixelBuf,
    /// Bounding box of the grown region.
    pub bounds: Rect,
}

/// Region growing from a circular seed (e.g. marker watershed).
///
/// Called on every marker-mode pointer move and after every keyboard edit
/// while a marker is active, so implementations should not cache by input.
pub trait MarkerGrower {
    fn grow(&self, image: &PixelBuf, marker: Marker) -> Grown;
}

impl<G: MarkerGrower + ?Sized> MarkerGrower for Box<G> {
    fn grow(&self, image: &PixelBuf, marker: Marker) -> Grown {
        (**self).grow(image, marker)
    }
}
