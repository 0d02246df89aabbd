// Author: Dustin Pilgrim
// License: MIT
//
// Viewer state and Wayland dispatch. Input is translated into editor events
// and fed to the session; any change schedules a redraw.

use eventline::{debug, warn};

use smithay_client_toolkit::{
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
};

use wayland_client::{
    Connection, Dispatch, QueueHandle, WEnum,
    protocol::{
        wl_buffer, wl_compositor, wl_keyboard, wl_output, wl_pointer, wl_seat, wl_shm, wl_shm_pool,
        wl_surface,
    },
};

use wayland_cursor::CursorTheme;

use wayland_protocols_wlr::layer_shell::v1::client::{zwlr_layer_shell_v1, zwlr_layer_surface_v1};

use clipper_core::{Button, ClipError, Modifiers, PointerEvent, PointerKind};

use super::keymap;
use super::surfaces::ViewSurface;
use crate::session::{EditorSession, Flow};

const BTN_LEFT: u32 = 272;
const BTN_RIGHT: u32 = 273;
const BTN_MIDDLE: u32 = 274;

// xkb modifier masks of the default keymap
const MOD_SHIFT: u32 = 0x1;
const MOD_CTRL: u32 = 0x4;
const MOD_ALT: u32 = 0x8;

pub struct App {
    pub registry_state: RegistryState,
    pub output_state: OutputState,

    pub session: EditorSession,
    pub wanted_output: Option<String>,

    pub background: u32,
    pub outline: u32,

    pub compositor: Option<wl_compositor::WlCompositor>,
    pub shm: Option<wl_shm::WlShm>,
    pub seat: Option<wl_seat::WlSeat>,
    pub layer_shell: Option<zwlr_layer_shell_v1::ZwlrLayerShellV1>,

    pub view: Option<ViewSurface>,

    pub pointer: Option<wl_pointer::WlPointer>,
    pub keyboard: Option<wl_keyboard::WlKeyboard>,

    pub cursor_surface: Option<wl_surface::WlSurface>,
    pub cursor_theme: Option<CursorTheme>,
    pub cursor_name: &'static str,

    pub mods: Modifiers,
    pub pointer_pos: (i32, i32),

    pub pending_redraw: bool,
    /// `Some(None)` on quit, `Some(Some(e))` when the session hit a fatal error.
    pub result: Option<Option<ClipError>>,
}

impl App {
    pub fn new(
        registry_state: RegistryState,
        output_state: OutputState,
        session: EditorSession,
        wanted_output: Option<String>,
        background: u32,
        outline: u32,
    ) -> Self {
        Self {
            registry_state,
            output_state,
            session,
            wanted_output,
            background,
            outline,

            compositor: None,
            shm: None,
            seat: None,
            layer_shell: None,

            view: None,

            pointer: None,
            keyboard: None,

            cursor_surface: None,
            cursor_theme: None,
            cursor_name: "crosshair",

            mods: Modifiers::default(),
            pointer_pos: (0, 0),

            pending_redraw: true,
            result: None,
        }
    }

    pub fn init_cursor(&mut self, conn: &Connection, qh: &QueueHandle<Self>) -> Result<(), String> {
        if self.cursor_theme.is_some() {
            return Ok(());
        }
        let compositor = self.compositor.as_ref().ok_or("no compositor")?;
        let shm = self.shm.as_ref().ok_or("no shm")?;

        let theme = CursorTheme::load(conn, shm.clone(), 24)
            .map_err(|e| format!("cursor: load theme: {e:?}"))?;
        let surf = compositor.create_surface(qh, ());

        self.cursor_theme = Some(theme);
        self.cursor_surface = Some(surf);
        Ok(())
    }

    pub fn set_cursor_image(&mut self, pointer: &wl_pointer::WlPointer, serial: u32) {
        let (Some(theme), Some(surf)) = (self.cursor_theme.as_mut(), self.cursor_surface.as_ref())
        else {
            return;
        };

        let cursor = match theme.get_cursor(self.cursor_name) {
            Some(c) => Some(c),
            None => theme.get_cursor("left_ptr"),
        };
        let Some(cursor) = cursor else { return };

        let img = &cursor[0];
        let (hx, hy) = img.hotspot();
        pointer.set_cursor(serial, Some(surf), hx as i32, hy as i32);

        surf.attach(Some(&**img), 0, 0);
        surf.commit();
    }

    pub fn finish(&mut self, fatal: Option<ClipError>) {
        self.result = Some(fatal);
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn request_redraw(&mut self) {
        let busy = self
            .view
            .as_ref()
            .and_then(|v| v.buf.as_ref())
            .is_some_and(|b| b.busy);

        if busy {
            self.pending_redraw = true;
            return;
        }

        if let Err(e) = super::render::redraw(self) {
            warn!("redraw: {e}");
        }
    }

    fn pointer_event(&mut self, kind: PointerKind) {
        let (x, y) = self.pointer_pos;
        let ev = PointerEvent::new(kind, x, y, self.mods);
        if self.session.handle_pointer(&ev) {
            self.request_redraw();
        }
    }

    fn key_pressed(&mut self, key: u32) {
        let Some(code) = keymap::translate(key, self.mods.shift) else {
            return;
        };
        match self.session.handle_key(code) {
            Ok(Flow::Quit) => self.finish(None),
            Ok(Flow::Continue { redraw }) => {
                if redraw {
                    self.request_redraw();
                }
            }
            Err(e) => self.finish(Some(e)),
        }
    }
}

pub fn modifiers_from_mask(mask: u32) -> Modifiers {
    Modifiers {
        shift: mask & MOD_SHIFT != 0,
        ctrl: mask & MOD_CTRL != 0,
        alt: mask & MOD_ALT != 0,
    }
}

fn button_from_code(code: u32) -> Option<Button> {
    match code {
        BTN_LEFT => Some(Button::Left),
        BTN_RIGHT => Some(Button::Right),
        BTN_MIDDLE => Some(Button::Middle),
        _ => None,
    }
}

impl ProvidesRegistryState for App {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }
    registry_handlers![OutputState];
}

impl OutputHandler for App {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {}

    fn update_output(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {}

    fn output_destroyed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, output: wl_output::WlOutput) {
        if self.view.as_ref().and_then(|v| v.output.as_ref()) == Some(&output) {
            warn!("viewer output went away");
            self.finish(None);
        }
    }
}

impl Dispatch<wl_compositor::WlCompositor, ()> for App {
    fn event(_: &mut Self, _: &wl_compositor::WlCompositor, _: wl_compositor::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<wl_shm::WlShm, ()> for App {
    fn event(_: &mut Self, _: &wl_shm::WlShm, _: wl_shm::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<wl_shm_pool::WlShmPool, ()> for App {
    fn event(_: &mut Self, _: &wl_shm_pool::WlShmPool, _: wl_shm_pool::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<wl_surface::WlSurface, ()> for App {
    fn event(_: &mut Self, _: &wl_surface::WlSurface, _: wl_surface::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<zwlr_layer_shell_v1::ZwlrLayerShellV1, ()> for App {
    fn event(_: &mut Self, _: &zwlr_layer_shell_v1::ZwlrLayerShellV1, _: zwlr_layer_shell_v1::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<zwlr_layer_surface_v1::ZwlrLayerSurfaceV1, ()> for App {
    fn event(
        state: &mut Self,
        proxy: &zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
        event: zwlr_layer_surface_v1::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            zwlr_layer_surface_v1::Event::Configure { serial, width, height } => {
                proxy.ack_configure(serial);
                super::surfaces::handle_configure(state, width, height, qh);
                state.pending_redraw = true;
                state.request_redraw();
            }
            zwlr_layer_surface_v1::Event::Closed => state.finish(None),
            _ => {}
        }
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for App {
    fn event(
        state: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _: &(),
        conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        let wl_seat::Event::Capabilities { capabilities: WEnum::Value(caps) } = event else {
            return;
        };

        if caps.contains(wl_seat::Capability::Pointer) && state.pointer.is_none() {
            state.pointer = Some(seat.get_pointer(qh, ()));
            if let Err(e) = state.init_cursor(conn, qh) {
                warn!("{e}");
            }
        }
        if caps.contains(wl_seat::Capability::Keyboard) && state.keyboard.is_none() {
            state.keyboard = Some(seat.get_keyboard(qh, ()));
        }
    }
}

impl Dispatch<wl_pointer::WlPointer, ()> for App {
    fn event(
        state: &mut Self,
        pointer: &wl_pointer::WlPointer,
        event: wl_pointer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_pointer::Event::Enter { serial, surface_x, surface_y, .. } => {
                state.set_cursor_image(pointer, serial);
                state.pointer_pos = (surface_x as i32, surface_y as i32);
            }

            wl_pointer::Event::Motion { surface_x, surface_y, .. } => {
                state.pointer_pos = (surface_x as i32, surface_y as i32);
                state.pointer_event(PointerKind::Move);
            }

            wl_pointer::Event::Button { button, state: btn_state, .. } => {
                let Some(b) = button_from_code(button) else {
                    return;
                };
                match btn_state {
                    WEnum::Value(wl_pointer::ButtonState::Pressed) => {
                        state.pointer_event(PointerKind::Down(b));
                    }
                    WEnum::Value(wl_pointer::ButtonState::Released) => {
                        state.pointer_event(PointerKind::Up(b));
                    }
                    _ => {}
                }
            }

            _ => {}
        }
    }
}

impl Dispatch<wl_keyboard::WlKeyboard, ()> for App {
    fn event(
        state: &mut Self,
        _: &wl_keyboard::WlKeyboard,
        event: wl_keyboard::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_keyboard::Event::Key { key, state: key_state, .. } => {
                if key_state == WEnum::Value(wl_keyboard::KeyState::Pressed) {
                    state.key_pressed(key);
                }
            }
            wl_keyboard::Event::Modifiers { mods_depressed, mods_latched, .. } => {
                state.mods = modifiers_from_mask(mods_depressed | mods_latched);
                debug!("modifiers {:?}", state.mods);
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_buffer::WlBuffer, ()> for App {
    fn event(
        state: &mut Self,
        buffer: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            super::surfaces::handle_buffer_release(state, buffer);
            if state.pending_redraw {
                state.request_redraw();
            }
        }
    }
}

smithay_client_toolkit::delegate_output!(App);
smithay_client_toolkit::delegate_registry!(App);
