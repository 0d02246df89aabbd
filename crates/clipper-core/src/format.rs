// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use crate::error::{ClipError, Result};

/// Image types accepted both as input frames and as save targets. Every
/// entry must encode an 8-bit RGB crop.
pub const IMAGE_TYPES: &[&str] = &[
    "bmp", "jpeg", "jpg", "png", "pbm", "pgm", "ppm", "tif", "tiff", "webp",
];

pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_TYPES.iter().any(|t| t.eq_ignore_ascii_case(ext))
}

/// Case-insensitive extension check; paths without an extension are not images.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_image_extension)
}

/// Rejects save targets whose extension is not in the allow-list.
pub fn check_output_format(path: &Path) -> Result<()> {
    if is_image_path(path) {
        return Ok(());
    }
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    Err(ClipError::UnsupportedOutputFormat { extension })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_case_insensitive() {
        assert!(is_image_path(Path::new("/a/b/CAT.JPG")));
        assert!(is_image_path(Path::new("x.tiff")));
        assert!(!is_image_path(Path::new("movie.avi")));
        assert!(!is_image_path(Path::new("README")));
    }

    #[test]
    fn unsupported_output_reports_extension() {
        let err = check_output_format(Path::new("/tmp/out.gifx")).unwrap_err();
        assert!(matches!(err, ClipError::UnsupportedOutputFormat { ref extension } if extension == "gifx"));
        assert!(check_output_format(Path::new("/tmp/out.png")).is_ok());
    }
}
