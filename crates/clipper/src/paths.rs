// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

const APP_DIR: &str = "clipper";

/// `$XDG_STATE_HOME/clipper/<file>`, falling back to `~/.local/state`, then `/tmp`.
pub fn default_log_path(file: &str) -> PathBuf {
    let base = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    base.join(APP_DIR).join(file)
}

/// `$XDG_CONFIG_HOME/clipper/clipper.rune`, falling back to `~/.config`.
pub fn default_config_path() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = std::env::var_os("HOME").unwrap_or_else(|| ".".into());
            PathBuf::from(home).join(".config")
        });
    base.join(APP_DIR).join("clipper.rune")
}

/// Directory, stem and extension of a frame path, as used by output templates.
/// A bare file name has directory `.`.
pub fn split_frame_path(path: &Path) -> (String, String, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (dir, stem, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_directory() {
        let (d, s, e) = split_frame_path(Path::new("/tmp/shots/cat.jpg"));
        assert_eq!((d.as_str(), s.as_str(), e.as_str()), ("/tmp/shots", "cat", "jpg"));
    }

    #[test]
    fn split_bare_name() {
        let (d, s, e) = split_frame_path(Path::new("movie.avi"));
        assert_eq!((d.as_str(), s.as_str(), e.as_str()), (".", "movie", "avi"));
    }
}
