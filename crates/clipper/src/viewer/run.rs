// Author: Dustin Pilgrim
// License: MIT

use eventline::{debug, info};

use wayland_client::Connection;
use wayland_client::globals::registry_queue_init;
use wayland_client::protocol::{wl_compositor, wl_seat, wl_shm};

use smithay_client_toolkit::output::OutputState;
use smithay_client_toolkit::registry::RegistryState;

use wayland_protocols_wlr::layer_shell::v1::client::zwlr_layer_shell_v1;

use clipper_core::ClipError;

use super::app::App;
use crate::session::EditorSession;

/// Runs the editor on a layer-shell surface until the user quits.
/// Returns the fatal session error that stopped it, if any.
pub fn run_viewer(
    session: EditorSession,
    output: Option<String>,
    background: u32,
    outline: u32,
) -> Result<Option<ClipError>, String> {
    let conn = Connection::connect_to_env().map_err(|e| format!("wayland connect: {e}"))?;
    let (globals, mut queue) =
        registry_queue_init(&conn).map_err(|e| format!("registry init: {e}"))?;
    let qh = queue.handle();

    let registry_state = RegistryState::new(&globals);
    let output_state = OutputState::new(&globals, &qh);

    let mut app = App::new(registry_state, output_state, session, output, background, outline);

    app.compositor = globals
        .bind::<wl_compositor::WlCompositor, _, _>(&qh, 1..=6, ())
        .ok();
    app.shm = globals.bind::<wl_shm::WlShm, _, _>(&qh, 1..=1, ()).ok();
    app.seat = globals.bind::<wl_seat::WlSeat, _, _>(&qh, 1..=7, ()).ok();
    app.layer_shell = globals
        .bind::<zwlr_layer_shell_v1::ZwlrLayerShellV1, _, _>(&qh, 1..=4, ())
        .ok();

    // outputs, then their xdg-output names
    queue.roundtrip(&mut app).map_err(|e| format!("roundtrip: {e}"))?;
    queue.roundtrip(&mut app).map_err(|e| format!("roundtrip2: {e}"))?;

    if app.compositor.is_none() {
        return Err("wl_compositor not available".into());
    }
    if app.layer_shell.is_none() {
        return Err("zwlr_layer_shell_v1 not available".into());
    }
    if app.shm.is_none() {
        return Err("wl_shm not available".into());
    }
    if app.seat.is_none() {
        return Err("wl_seat not available".into());
    }

    app.init_cursor(&conn, &qh)?;
    super::surfaces::create_surface(&mut app, &qh)?;
    info!("viewer up: {}", app.session.title());

    while !app.is_finished() {
        queue.blocking_dispatch(&mut app).map_err(|e| format!("dispatch: {e}"))?;
        let _ = conn.flush();
    }

    if let Some(view) = app.view.take() {
        view.layer_surface.destroy();
        view.surface.destroy();
    }
    let _ = conn.flush();
    debug!("viewer closed");

    Ok(app.result.flatten())
}
