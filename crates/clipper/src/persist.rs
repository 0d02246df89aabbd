// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageError, RgbImage, RgbaImage};

use clipper_core::format::check_output_format;
use clipper_core::{ClipError, PixelBuf};

/// Writes `img` to `path`, creating parent directories. The format follows
/// the extension, which must be in the allow-list.
pub fn write_image(path: &Path, img: &PixelBuf) -> Result<(), ClipError> {
    check_output_format(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    to_dynamic(img)?.save(path).map_err(|e| match e {
        ImageError::IoError(io) => ClipError::Io(io),
        other => ClipError::Encode(other.to_string()),
    })
}

fn to_dynamic(img: &PixelBuf) -> Result<DynamicImage, ClipError> {
    let (w, h) = (img.width(), img.height());
    let data = img.as_bytes().to_vec();
    let bad = || ClipError::Encode(format!("{} channel image", img.channels()));

    let dynamic = match img.channels() {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, data).ok_or_else(bad)?),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, data).ok_or_else(bad)?),
        4 => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, data).ok_or_else(bad)?),
        _ => return Err(bad()),
    };
    Ok(dynamic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipper_core::format::IMAGE_TYPES;

    #[test]
    fn writes_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        let mut img = PixelBuf::new(3, 2, 3);
        img.put(2, 1, &[9, 8, 7]);

        write_image(&path, &img).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1).0, [9, 8, 7]);
    }

    #[test]
    fn every_listed_type_saves_an_rgb_crop() {
        let dir = tempfile::tempdir().unwrap();
        let mut img = PixelBuf::new(4, 3, 3);
        img.put(1, 1, &[200, 100, 50]);

        for ext in IMAGE_TYPES {
            let path = dir.path().join(format!("out.{ext}"));
            if let Err(e) = write_image(&path, &img) {
                panic!("{ext}: {e}");
            }
            assert!(path.is_file(), "{ext}: nothing written");
        }
    }

    #[test]
    fn gray_and_rgba_buffers() {
        let dir = tempfile::tempdir().unwrap();
        write_image(&dir.path().join("g.png"), &PixelBuf::new(2, 2, 1)).unwrap();
        write_image(&dir.path().join("a.png"), &PixelBuf::new(2, 2, 4)).unwrap();
        assert!(matches!(
            write_image(&dir.path().join("x.png"), &PixelBuf::new(2, 2, 2)),
            Err(ClipError::Encode(_))
        ));
    }

    #[test]
    fn rejects_unknown_extension_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/out.xyz");
        let err = write_image(&path, &PixelBuf::new(1, 1, 3)).unwrap_err();
        assert!(matches!(err, ClipError::UnsupportedOutputFormat { .. }));
        assert!(!dir.path().join("sub").exists());
    }
}
