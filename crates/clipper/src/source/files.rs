// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use eventline::debug;

use clipper_core::format::is_image_path;
use clipper_core::ClipError;

use super::{Frame, FrameSource, SourceKind, rgb_to_pixels};

/// Sorted image files of one directory.
pub struct FileList {
    paths: Vec<PathBuf>,
    index: usize,
    current: Frame,
}

impl FileList {
    /// Every image in `dir`, starting at the 1-based `start`.
    pub fn open_dir(dir: &Path, start: Option<u64>) -> Result<Self, String> {
        let paths = list_images(dir)?;
        let index = start.unwrap_or(1).saturating_sub(1) as usize;
        Self::from_paths(paths, index)
    }

    /// Every image next to `file`, starting at `file` itself unless `start`
    /// says otherwise.
    pub fn open_at(file: &Path, start: Option<u64>) -> Result<Self, String> {
        let dir = match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let paths = list_images(&dir)?;

        let index = match start {
            Some(n) => n.saturating_sub(1) as usize,
            None => {
                let name = file.file_name();
                paths
                    .iter()
                    .position(|p| p.file_name() == name)
                    .ok_or_else(|| format!("{}: not found in {}", file.display(), dir.display()))?
            }
        };
        Self::from_paths(paths, index)
    }

    fn from_paths(paths: Vec<PathBuf>, index: usize) -> Result<Self, String> {
        if paths.is_empty() {
            return Err("no image files found".into());
        }
        let path = paths.get(index).ok_or_else(|| {
            format!("frame {} is past the last image ({})", index + 1, paths.len())
        })?;
        let current = decode(path, index).map_err(|e| format!("{}: {e}", path.display()))?;
        debug!("file list: {} images, starting at {}", paths.len(), index + 1);

        Ok(Self {
            paths,
            index,
            current,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    fn step_to(&mut self, index: usize) -> Result<&Frame, ClipError> {
        let path = self.paths.get(index).ok_or(ClipError::SourceUnavailable)?;
        self.current = decode(path, index)?;
        self.index = index;
        Ok(&self.current)
    }
}

impl FrameSource for FileList {
    fn current(&self) -> &Frame {
        &self.current
    }

    fn forward(&mut self) -> Result<&Frame, ClipError> {
        self.step_to(self.index + 1)
    }

    fn backward(&mut self) -> Result<&Frame, ClipError> {
        let prev = self.index.checked_sub(1).ok_or(ClipError::SourceUnavailable)?;
        self.step_to(prev)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Images
    }
}

/// Regular files with an allow-listed extension, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| format!("read dir {}: {e}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("read dir {}: {e}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && is_image_path(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn decode(path: &Path, index: usize) -> Result<Frame, ClipError> {
    let img = image::open(path).map_err(|e| ClipError::Decode(e.to_string()))?;
    Ok(Frame {
        image: rgb_to_pixels(img.to_rgb8())?,
        number: index as u64 + 1,
        path: path.to_path_buf(),
    })
}
