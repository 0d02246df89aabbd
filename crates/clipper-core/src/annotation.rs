// Author: Dustin Pilgrim
// License: MIT

use crate::rect::Rect;

/// Source image and region recovered from a clip filename written by the
/// default image template (`<stem>.<ext>_<r>_<x>_<y>_<w>_<h>.<ext>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipAnnotation {
    /// File name of the image the clip was cut from, e.g. `cat.jpg`.
    pub source: String,
    pub rotation: i32,
    pub rect: Rect,
}

impl ClipAnnotation {
    /// Haar-training line: `<prefix/source> 1 x y w h`, with every value
    /// clamped at zero.
    pub fn haar_line(&self, source_path: &str) -> String {
        let r = self.rect;
        format!(
            "{} 1 {} {} {} {}",
            source_path,
            r.x.max(0),
            r.y.max(0),
            r.w.max(0),
            r.h.max(0)
        )
    }
}

/// Parses a clip file name. The source name is the shortest prefix that
/// contains a '.' and is followed by five `_`-separated signed integers and
/// another '.'.
pub fn parse_clip_name(name: &str) -> Option<ClipAnnotation> {
    let dot = name.find('.')?;

    for (i, _) in name.match_indices('_').filter(|(i, _)| *i > dot) {
        if let Some([rotation, x, y, w, h]) = numeric_block(&name[i + 1..]) {
            return Some(ClipAnnotation {
                source: name[..i].to_string(),
                rotation,
                rect: Rect::new(x, y, w, h),
            });
        }
    }
    None
}

// "<n>_<n>_<n>_<n>_<n>.<anything>"
fn numeric_block(s: &str) -> Option<[i32; 5]> {
    let (nums, _) = s.split_once('.')?;
    let mut out = [0i32; 5];
    let mut parts = nums.split('_');
    for slot in out.iter_mut() {
        *slot = parse_signed(parts.next()?)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

fn parse_signed(s: &str) -> Option<i32> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_template_output() {
        let a = parse_clip_name("cat.jpg_0000_0005_0010_0020_0030.png").unwrap();
        assert_eq!(a.source, "cat.jpg");
        assert_eq!(a.rotation, 0);
        assert_eq!(a.rect, Rect::new(5, 10, 20, 30));
        assert_eq!(a.haar_line("imgs/cat.jpg"), "imgs/cat.jpg 1 5 10 20 30");
    }

    #[test]
    fn underscores_in_the_stem_are_kept() {
        let a = parse_clip_name("my_cat.v2_shot.jpg_0012_-003_0004_0010_0010.png").unwrap();
        assert_eq!(a.source, "my_cat.v2_shot.jpg");
        assert_eq!(a.rotation, 12);
        assert_eq!(a.rect, Rect::new(-3, 4, 10, 10));
        assert_eq!(a.haar_line("x"), "x 1 0 4 10 10");
    }

    #[test]
    fn rejects_other_names() {
        assert!(parse_clip_name("notes.txt").is_none());
        assert!(parse_clip_name("cat.jpg_1_2_3_4.png").is_none());
        assert!(parse_clip_name("cat.jpg_1_2_3_4_5").is_none());
        assert!(parse_clip_name("cat_1_2_3_4_5.png").is_none());
    }
}
