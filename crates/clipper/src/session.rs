// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use eventline::{debug, error, info, warn};
use image::imageops::{self, FilterType};

use clipper_core::keys::{Command, apply_key_edit, command_for_key};
use clipper_core::outline::{crop_preview, draw_marker_outline, draw_outline};
use clipper_core::template::{TemplateValues, expand};
use clipper_core::{
    ClipError, GestureStatus, MarkerGrower, OrientedRegion, Outcome, PixelBuf, PointerEvent,
    handle_pointer, resample,
};

use crate::config::Templates;
use crate::paths::split_frame_path;
use crate::persist::write_image;
use crate::source::{FrameSource, SourceKind};

/// What the event loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue { redraw: bool },
    Quit,
}

/// Everything the viewer edits: the region and gesture, the current frame
/// in source and display resolution, and the save settings.
pub struct EditorSession {
    source: Box<dyn FrameSource>,
    grower: Box<dyn MarkerGrower>,
    templates: Templates,
    outline: [u8; 3],

    region: OrientedRegion,
    gesture: GestureStatus,

    fit: Option<(u32, u32)>,
    display: PixelBuf,
    scale: f32,
    marker_view: Option<PixelBuf>,
}

impl EditorSession {
    pub fn new(
        source: Box<dyn FrameSource>,
        grower: Box<dyn MarkerGrower>,
        templates: Templates,
        outline: [u8; 3],
    ) -> Self {
        let display = source.current().image.clone();
        let mut session = Self {
            source,
            grower,
            templates,
            outline,
            region: OrientedRegion::default(),
            gesture: GestureStatus::default(),
            fit: None,
            display,
            scale: 1.0,
            marker_view: None,
        };
        session.announce();
        session
    }

    /// Limits the display image to `width` x `height`, downscaling the
    /// frame when it is larger. The region is kept as is.
    pub fn fit_to(&mut self, width: u32, height: u32) {
        if self.fit == Some((width, height)) {
            return;
        }
        self.fit = Some((width, height));
        self.refresh_display();
    }

    /// Title line for the viewer (current file and frame).
    pub fn title(&self) -> String {
        let f = self.source.current();
        format!("{} [{}]", f.path.display(), f.number)
    }

    /// Display image with the region outline, or the marker overlay.
    pub fn view(&self) -> PixelBuf {
        match (&self.region.marker, &self.marker_view) {
            (Some(_), Some(overlay)) => overlay.clone(),
            _ => draw_outline(&self.display, &self.region, &self.outline),
        }
    }

    /// Crop of the full-resolution frame, if the region has an area.
    pub fn preview(&self) -> Option<PixelBuf> {
        if !self.region.rect.has_area() {
            return None;
        }
        crop_preview(&self.source.current().image, &self.region, self.scale).ok()
    }

    /// Returns true when the view changed.
    pub fn handle_pointer(&mut self, ev: &PointerEvent) -> bool {
        let outcome = handle_pointer(&mut self.region, &mut self.gesture, ev);
        self.apply_outcome(outcome)
    }

    /// Runs the command bound to `key`. Only an unsupported output format
    /// is returned as an error; other save failures are logged.
    pub fn handle_key(&mut self, key: char) -> Result<Flow, ClipError> {
        let Some(cmd) = command_for_key(key) else {
            return Ok(Flow::Continue { redraw: false });
        };
        debug!("key {key:?} -> {cmd:?}");

        let flow = match cmd {
            Command::Quit => Flow::Quit,
            Command::Save => {
                self.save_logged()?;
                Flow::Continue { redraw: false }
            }
            Command::SaveAndForward => {
                self.save_logged()?;
                Flow::Continue {
                    redraw: self.forward(),
                }
            }
            Command::Forward => Flow::Continue {
                redraw: self.forward(),
            },
            Command::Backward => Flow::Continue {
                redraw: self.backward(),
            },
            Command::Edit(edit) => {
                let bounds = self.display.bounds();
                let outcome = apply_key_edit(&mut self.region, edit, bounds);
                Flow::Continue {
                    redraw: self.apply_outcome(outcome),
                }
            }
        };
        Ok(flow)
    }

    /// Crops the region out of the current source frame and writes it to
    /// the templated path. `Ok(None)` when the region is empty.
    pub fn save(&self) -> Result<Option<PathBuf>, ClipError> {
        if !self.region.rect.has_area() {
            return Ok(None);
        }
        let src = self.region.to_source(self.scale);
        if !src.rect.has_area() {
            return Ok(None);
        }

        let frame = self.source.current();
        let (dirname, stem, extension) = split_frame_path(&frame.path);
        let values = TemplateValues {
            dirname,
            stem,
            extension,
            x: src.rect.x,
            y: src.rect.y,
            width: src.rect.w,
            height: src.rect.h,
            frame: frame.number,
            rotation: src.normalized_rotation() as i32,
            shear_x: src.shear.x,
            shear_y: src.shear.y,
        };
        let template = match self.source.kind() {
            SourceKind::Images => &self.templates.image,
            SourceKind::Video => &self.templates.video,
        };
        let path = PathBuf::from(expand(template, &values));

        clipper_core::format::check_output_format(&path)?;
        let crop = resample(&frame.image, &src)?;
        write_image(&path, &crop)?;
        Ok(Some(path))
    }

    fn save_logged(&self) -> Result<(), ClipError> {
        match self.save() {
            Ok(Some(path)) => {
                info!("saved {}", path.display());
                println!("{}", path.display());
                Ok(())
            }
            Ok(None) => {
                debug!("save skipped: region has no area");
                Ok(())
            }
            Err(e @ ClipError::UnsupportedOutputFormat { .. }) => Err(e),
            Err(e) => {
                error!("save failed: {e}");
                Ok(())
            }
        }
    }

    fn forward(&mut self) -> bool {
        let step = self.source.forward().map(|_| ());
        self.after_step(step, "forward")
    }

    fn backward(&mut self) -> bool {
        let step = self.source.backward().map(|_| ());
        self.after_step(step, "backward")
    }

    fn after_step(&mut self, step: Result<(), ClipError>, dir: &str) -> bool {
        match step {
            Ok(()) => {
                self.refresh_display();
                self.announce();
                true
            }
            Err(ClipError::SourceUnavailable) => {
                debug!("{dir}: no more frames");
                false
            }
            Err(e) => {
                warn!("{dir}: {e}");
                false
            }
        }
    }

    fn announce(&self) {
        let f = self.source.current();
        info!("now showing {} (frame {})", f.path.display(), f.number);
    }

    fn refresh_display(&mut self) {
        let src = &self.source.current().image;
        let (display, scale) = match self.fit {
            Some((w, h)) => fit_image(src, w, h),
            None => (src.clone(), 1.0),
        };
        self.display = display;
        self.scale = scale;
        debug!(
            "display {}x{} (scale {:.3})",
            self.display.width(),
            self.display.height(),
            self.scale
        );

        if self.region.marker_active() {
            self.regrow();
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Ignored => false,
            Outcome::RegionChanged => {
                if !self.region.marker_active() {
                    self.marker_view = None;
                }
                true
            }
            Outcome::MarkerChanged => {
                self.regrow();
                true
            }
        }
    }

    fn regrow(&mut self) {
        let Some(marker) = self.region.marker else {
            self.marker_view = None;
            return;
        };
        let (overlay, rect) =
            draw_marker_outline(&self.display, marker, self.grower.as_ref(), &self.outline);
        self.region.rect = rect;
        self.marker_view = Some(overlay);
    }
}

/// Downscales `src` to fit `max_w` x `max_h`, never upscaling.
fn fit_image(src: &PixelBuf, max_w: u32, max_h: u32) -> (PixelBuf, f32) {
    let (w, h) = (src.width(), src.height());
    if w == 0 || h == 0 || (w <= max_w && h <= max_h) {
        return (src.clone(), 1.0);
    }

    let scale = (max_w as f32 / w as f32).min(max_h as f32 / h as f32);
    let dw = ((w as f32 * scale).round() as u32).max(1);
    let dh = ((h as f32 * scale).round() as u32).max(1);

    let Some(rgb) = image::RgbImage::from_raw(w, h, rgb_bytes(src)) else {
        return (src.clone(), 1.0);
    };
    let small = imageops::resize(&rgb, dw, dh, FilterType::Triangle);
    match PixelBuf::from_raw(dw, dh, 3, small.into_raw()) {
        Ok(buf) => (buf, dw as f32 / w as f32),
        Err(_) => (src.clone(), 1.0),
    }
}

fn rgb_bytes(src: &PixelBuf) -> Vec<u8> {
    if src.channels() == 3 {
        return src.as_bytes().to_vec();
    }
    let mut out = Vec::with_capacity(src.width() as usize * src.height() as usize * 3);
    for y in 0..src.height() {
        for x in 0..src.width() {
            let p = src.pixel(x, y);
            let last = p.len().saturating_sub(1);
            out.extend((0..3).map(|c| p.get(c.min(last)).copied().unwrap_or(0)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipper_core::{
        Button, Grown, Marker, Modifiers, Point, PointerKind, Rect, Shear,
    };
    use crate::source::Frame;

    struct FakeSource {
        frames: Vec<Frame>,
        index: usize,
        kind: SourceKind,
    }

    impl FakeSource {
        fn new(dir: &std::path::Path, count: usize, w: u32, h: u32) -> Self {
            let frames = (0..count)
                .map(|i| {
                    let mut image = PixelBuf::new(w, h, 3);
                    for y in 0..h {
                        for x in 0..w {
                            image.put(x as i64, y as i64, &[x as u8, y as u8, i as u8]);
                        }
                    }
                    Frame {
                        image,
                        number: i as u64 + 1,
                        path: dir.join(format!("f{i}.png")),
                    }
                })
                .collect();
            Self {
                frames,
                index: 0,
                kind: SourceKind::Images,
            }
        }
    }

    impl FrameSource for FakeSource {
        fn current(&self) -> &Frame {
            &self.frames[self.index]
        }

        fn forward(&mut self) -> Result<&Frame, ClipError> {
            if self.index + 1 >= self.frames.len() {
                return Err(ClipError::SourceUnavailable);
            }
            self.index += 1;
            Ok(&self.frames[self.index])
        }

        fn backward(&mut self) -> Result<&Frame, ClipError> {
            if self.index == 0 {
                return Err(ClipError::SourceUnavailable);
            }
            self.index -= 1;
            Ok(&self.frames[self.index])
        }

        fn kind(&self) -> SourceKind {
            self.kind
        }
    }

    /// Grows to a box of side 2r around the centre.
    struct BoxGrower;

    impl MarkerGrower for BoxGrower {
        fn grow(&self, image: &PixelBuf, m: Marker) -> Grown {
            Grown {
                image: image.clone(),
                bounds: Rect::new(m.center.x - m.radius, m.center.y - m.radius, 2 * m.radius, 2 * m.radius),
            }
        }
    }

    fn session(dir: &std::path::Path, count: usize, template: &str) -> EditorSession {
        let templates = Templates {
            image: template.to_string(),
            video: template.to_string(),
        };
        EditorSession::new(
            Box::new(FakeSource::new(dir, count, 40, 30)),
            Box::new(BoxGrower),
            templates,
            [255, 255, 0],
        )
    }

    fn drag(s: &mut EditorSession, button: Button, from: (i32, i32), to: (i32, i32)) {
        let m = Modifiers::default();
        s.handle_pointer(&PointerEvent::new(PointerKind::Down(button), from.0, from.1, m));
        s.handle_pointer(&PointerEvent::new(PointerKind::Move, to.0, to.1, m));
        s.handle_pointer(&PointerEvent::new(PointerKind::Up(button), to.0, to.1, m));
    }

    #[test]
    fn save_writes_templated_crop() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), 1, "%d/out/%i_%x_%y_%w_%h.png");
        drag(&mut s, Button::Left, (5, 6), (15, 10));

        let path = s.save().unwrap().unwrap();
        assert_eq!(path, dir.path().join("out/f0_5_6_10_4.png"));

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (10, 4));
        assert_eq!(img.get_pixel(0, 0).0, [5, 6, 0]);
    }

    #[test]
    fn empty_region_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(dir.path(), 1, "%d/out/%i.png");
        assert_eq!(s.save().unwrap(), None);
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn unsupported_format_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), 1, "%d/%i.nope");
        drag(&mut s, Button::Left, (1, 1), (5, 5));
        assert!(matches!(
            s.handle_key('s'),
            Err(ClipError::UnsupportedOutputFormat { .. })
        ));
    }

    #[test]
    fn navigation_keeps_region() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), 2, "%d/%i.png");
        drag(&mut s, Button::Left, (2, 2), (12, 9));
        let before = s.region;

        assert_eq!(s.handle_key('f').unwrap(), Flow::Continue { redraw: true });
        assert_eq!(s.source.current().number, 2);
        assert_eq!(s.region, before);

        assert_eq!(s.handle_key('f').unwrap(), Flow::Continue { redraw: false });
        assert_eq!(s.source.current().number, 2);

        s.handle_key('b').unwrap();
        assert_eq!(s.source.current().number, 1);
        assert_eq!(s.handle_key('q').unwrap(), Flow::Quit);
    }

    #[test]
    fn space_saves_then_advances() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), 2, "%d/clips/%i_%f.png");
        drag(&mut s, Button::Left, (0, 0), (4, 4));
        s.handle_key(' ').unwrap();
        assert!(dir.path().join("clips/f0_1.png").exists());
        assert_eq!(s.source.current().number, 2);
    }

    #[test]
    fn marker_drives_rectangle() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), 1, "%d/%i.png");
        drag(&mut s, Button::Middle, (20, 15), (23, 19));
        assert_eq!(s.region.marker, Some(Marker::new(Point::new(20, 15), 5)));
        assert_eq!(s.region.rect, Rect::new(15, 10, 10, 10));

        // keyboard grows the marker, the rectangle follows
        s.handle_key('e').unwrap();
        assert_eq!(s.region.rect, Rect::new(14, 9, 12, 12));
    }

    #[test]
    fn downscaled_display_saves_in_source_space() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), 1, "%d/%x_%y_%w_%h.png");
        s.fit_to(20, 20);
        assert_eq!((s.display.width(), s.display.height()), (20, 15));
        assert!((s.scale - 0.5).abs() < 1e-6);

        drag(&mut s, Button::Left, (2, 3), (7, 8));
        let path = s.save().unwrap().unwrap();
        assert_eq!(path, dir.path().join("4_6_10_10.png"));
        assert_eq!(s.preview().map(|p| (p.width(), p.height())), Some((10, 10)));
    }

    #[test]
    fn reset_key_selects_display_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), 1, "%d/%i.png");
        s.handle_key('a').unwrap();
        assert_eq!(s.region.rect, Rect::new(0, 0, 40, 30));
        assert_eq!(s.region.shear, Shear::default());
    }

    #[test]
    fn view_is_a_copy() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), 1, "%d/%i.png");
        drag(&mut s, Button::Left, (1, 1), (6, 6));
        let v = s.view();
        assert_eq!(v.pixel(1, 1), &[255, 255, 0]);
        assert_ne!(s.display.pixel(1, 1), &[255, 255, 0]);
    }
}
