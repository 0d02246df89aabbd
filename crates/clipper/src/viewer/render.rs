// Author: Dustin Pilgrim
// License: MIT

use super::app::App;

const PREVIEW_MARGIN: i32 = 8;
const PREVIEW_FRAME: i32 = 2;

/// Where the crop preview goes: top-right, at most a third of the surface
/// each way, never upscaled. Returns `(x, y, w, h)` of the image itself.
pub fn preview_placement(surf_w: i32, surf_h: i32, pw: u32, ph: u32) -> Option<(i32, i32, i32, i32)> {
    if pw == 0 || ph == 0 {
        return None;
    }
    let max_w = (surf_w / 3).max(1) as f32;
    let max_h = (surf_h / 3).max(1) as f32;
    let scale = (max_w / pw as f32).min(max_h / ph as f32).min(1.0);

    let w = ((pw as f32 * scale).round() as i32).max(1);
    let h = ((ph as f32 * scale).round() as i32).max(1);
    let x = surf_w - w - PREVIEW_MARGIN - PREVIEW_FRAME;
    let y = PREVIEW_MARGIN + PREVIEW_FRAME;
    Some((x, y, w, h))
}

pub fn redraw(app: &mut App) -> Result<(), String> {
    let Some(view) = app.view.as_mut() else {
        return Ok(());
    };
    if !view.configured {
        return Ok(());
    }
    let buf = view.buf.as_mut().ok_or("no shm buffer")?;
    if buf.busy {
        app.pending_redraw = true;
        return Ok(());
    }

    let frame = app.session.view();
    let preview = app.session.preview();

    let (bw, bh) = (buf.width, buf.height);
    {
        let mut canvas = buf.canvas();
        canvas.fill(app.background);
        canvas.blit(&frame, 0, 0);

        if let Some(p) = preview {
            if let Some((x, y, w, h)) = preview_placement(bw, bh, p.width(), p.height()) {
                canvas.border(
                    x - PREVIEW_FRAME,
                    y - PREVIEW_FRAME,
                    w + 2 * PREVIEW_FRAME,
                    h + 2 * PREVIEW_FRAME,
                    PREVIEW_FRAME,
                    app.outline,
                );
                canvas.blit_scaled(&p, x, y, w, h);
            }
        }
    }

    view.surface.attach(Some(&buf.buffer), 0, 0);
    view.surface.damage_buffer(0, 0, bw, bh);
    view.surface.commit();
    buf.busy = true;

    app.pending_redraw = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_preview_keeps_its_size() {
        assert_eq!(preview_placement(1920, 1080, 100, 50), Some((1810, 10, 100, 50)));
    }

    #[test]
    fn large_preview_is_capped_at_a_third() {
        let (_, _, w, h) = preview_placement(900, 900, 1200, 600).unwrap();
        assert_eq!((w, h), (300, 150));
    }

    #[test]
    fn empty_preview_is_skipped() {
        assert_eq!(preview_placement(900, 900, 0, 10), None);
    }
}
