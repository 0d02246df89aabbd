// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::io::Write;
use std::path::Path;

use eventline::{debug, info};

use clipper_core::parse_clip_name;

/// Prints one Haar-training line per clip in `clipdir` whose source image
/// exists under `prefix`. Stops at the first name that is not a clip.
pub fn annotate(clipdir: &Path, prefix: &Path, out: &mut impl Write) -> Result<(), String> {
    let entries = fs::read_dir(clipdir).map_err(|e| format!("read {}: {e}", clipdir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("read {}: {e}", clipdir.display()))?;
        if entry.path().is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let mut written = 0usize;
    for name in &names {
        let clip = parse_clip_name(name).ok_or_else(|| format!("{name}: not a clip file name"))?;

        let source = prefix.join(&clip.source);
        if !source.exists() {
            debug!("{name}: source {} missing, skipped", source.display());
            continue;
        }

        writeln!(out, "{}", clip.haar_line(&source.to_string_lossy()))
            .map_err(|e| format!("write: {e}"))?;
        written += 1;
    }

    info!("annotated {written} of {} clips", names.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn lines_for_existing_sources_only() {
        let src = tempfile::tempdir().unwrap();
        let clips = tempfile::tempdir().unwrap();
        touch(&src.path().join("cat.jpg"));
        touch(&clips.path().join("cat.jpg_0000_0010_-005_0030_0040.png"));
        touch(&clips.path().join("dog.jpg_0000_0001_0002_0003_0004.png"));
        fs::create_dir(clips.path().join("subdir")).unwrap();

        let mut out = Vec::new();
        annotate(clips.path(), src.path(), &mut out).unwrap();

        let expected = format!("{} 1 10 0 30 40\n", src.path().join("cat.jpg").display());
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn bad_name_stops_the_listing() {
        let src = tempfile::tempdir().unwrap();
        let clips = tempfile::tempdir().unwrap();
        touch(&src.path().join("a.png"));
        touch(&src.path().join("c.png"));
        touch(&clips.path().join("a.png_0_1_1_2_2.png"));
        touch(&clips.path().join("b-notes.txt"));
        touch(&clips.path().join("c.png_0_1_1_2_2.png"));

        let mut out = Vec::new();
        let err = annotate(clips.path(), src.path(), &mut out).unwrap_err();
        assert!(err.contains("b-notes.txt"), "{err}");

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("a.png 1 1 1 2 2"));
    }

    #[test]
    fn missing_clipdir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        assert!(annotate(&dir.path().join("nope"), Path::new(""), &mut out).is_err());
    }
}
