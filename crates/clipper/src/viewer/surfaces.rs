// Author: Dustin Pilgrim
// License: MIT

use eventline::{debug, info, warn};

use wayland_client::QueueHandle;
use wayland_client::protocol::{wl_buffer, wl_output, wl_surface};

use wayland_protocols_wlr::layer_shell::v1::client::{zwlr_layer_shell_v1, zwlr_layer_surface_v1};

use super::app::App;
use super::outputs::{self, OutputInfo};
use super::shm::ShmBuffer;

pub struct ViewSurface {
    pub output: Option<wl_output::WlOutput>,
    pub surface: wl_surface::WlSurface,
    pub layer_surface: zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
    pub buf: Option<ShmBuffer>,
    pub configured: bool,
}

/// Creates the full-screen layer surface on the chosen output. Without any
/// known output the compositor picks one.
pub fn create_surface(app: &mut App, qh: &QueueHandle<App>) -> Result<(), String> {
    if app.view.is_some() {
        return Ok(());
    }

    let compositor = app.compositor.as_ref().ok_or("no compositor")?;
    let layer_shell = app.layer_shell.as_ref().ok_or("no layer_shell")?;

    let known = outputs::list_outputs(&app.output_state);
    let infos: Vec<OutputInfo> = known.iter().map(|(_, info)| info.clone()).collect();

    let output = match outputs::choose(&infos, app.wanted_output.as_deref()) {
        Some(i) => {
            let (wl_output, info) = &known[i];
            info!(
                "viewer on {} ({}x{})",
                info.name.as_deref().unwrap_or("unnamed output"),
                info.width,
                info.height
            );
            Some(wl_output.clone())
        }
        None => {
            if let Some(name) = app.wanted_output.as_deref() {
                let names: Vec<&str> = infos.iter().filter_map(|o| o.name.as_deref()).collect();
                return Err(format!("no output named {name} (have: {})", names.join(", ")));
            }
            debug!("no outputs reported, letting the compositor choose");
            None
        }
    };

    let surface = compositor.create_surface(qh, ());
    let layer_surface = layer_shell.get_layer_surface(
        &surface,
        output.as_ref(),
        zwlr_layer_shell_v1::Layer::Overlay,
        "clipper".into(),
        qh,
        (),
    );

    layer_surface.set_anchor(
        zwlr_layer_surface_v1::Anchor::Top
            | zwlr_layer_surface_v1::Anchor::Bottom
            | zwlr_layer_surface_v1::Anchor::Left
            | zwlr_layer_surface_v1::Anchor::Right,
    );
    layer_surface.set_keyboard_interactivity(zwlr_layer_surface_v1::KeyboardInteractivity::Exclusive);
    layer_surface.set_exclusive_zone(-1);
    layer_surface.set_size(0, 0);

    surface.commit();

    app.view = Some(ViewSurface {
        output,
        surface,
        layer_surface,
        buf: None,
        configured: false,
    });
    Ok(())
}

/// Resizes the buffer to the configured size and refits the display image.
pub fn handle_configure(app: &mut App, width: u32, height: u32, qh: &QueueHandle<App>) {
    if width == 0 || height == 0 {
        warn!("layer surface configured with a zero size");
        return;
    }
    let Some(view) = app.view.as_mut() else { return };

    let (w, h) = (width as i32, height as i32);
    let needs_resize = view.buf.as_ref().is_none_or(|b| b.width != w || b.height != h);

    if needs_resize {
        if let Some(shm) = app.shm.as_ref() {
            match ShmBuffer::new(shm, qh, w, h) {
                Ok(buf) => {
                    if let Some(old) = view.buf.replace(buf) {
                        old.destroy();
                    }
                }
                Err(e) => warn!("shm buffer {w}x{h}: {e}"),
            }
        }
    }
    view.configured = true;

    app.session.fit_to(width, height);
}

pub fn handle_buffer_release(app: &mut App, buffer: &wl_buffer::WlBuffer) {
    if let Some(buf) = app.view.as_mut().and_then(|v| v.buf.as_mut()) {
        if &buf.buffer == buffer {
            buf.busy = false;
        }
    }
}
