use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::canvas::render::{ImageRenderer, RectRenderer, RenderCtx, RenderTarget};
use crate::canvas::{Canvas, DrawList};
use crate::coords::Vec2;
use crate::event::{Event, EventData, Key, MouseButton};
use crate::gpu::{Gfx, SurfaceErrorAction};
use crate::image::ImageCache;
use crate::scene::{draw_default_title_bar, SceneRegistry};
use crate::time::FrameClock;

use super::{
    route_event, AppFlags, AppSpec, PointerState, RuntimeCommand, SceneCtx, TitleBarFn,
};

/// Live state behind the winit event loop.
///
/// Lifecycle: Initializing (no window yet) → Running (window + GPU live,
/// frames flowing) → ShuttingDown (event loop exited; GPU resources drop
/// with this struct, before the window).
pub(crate) struct RuntimeState {
    spec: AppSpec,
    scenes: SceneRegistry,
    images: ImageCache,
    title_bar: Option<TitleBarFn>,

    queue: VecDeque<Event>,
    pointer: PointerState,
    clock: FrameClock,

    draw_list: DrawList,
    rect_renderer: RectRenderer,
    image_renderer: ImageRenderer,

    window: Option<Arc<Window>>,
    gfx: Option<Gfx>,

    running: bool,
    init_error: Option<anyhow::Error>,
}

impl RuntimeState {
    pub fn new(
        spec: AppSpec,
        scenes: SceneRegistry,
        images: ImageCache,
        title_bar: Option<TitleBarFn>,
    ) -> Self {
        Self {
            spec,
            scenes,
            images,
            title_bar,
            queue: VecDeque::new(),
            pointer: PointerState::default(),
            clock: FrameClock::new(),
            draw_list: DrawList::new(),
            rect_renderer: RectRenderer::new(),
            image_renderer: ImageRenderer::new(),
            window: None,
            gfx: None,
            running: true,
            init_error: None,
        }
    }

    /// Startup failures are held here until the loop unwinds; `run` turns
    /// them back into a hard error for the caller.
    pub fn into_result(self) -> Result<()> {
        match self.init_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.spec.name.clone())
            .with_inner_size(LogicalSize::new(
                self.spec.width as f64,
                self.spec.height as f64,
            ))
            .with_decorations(!self.spec.has_flag(AppFlags::CUSTOM_TITLE_BAR));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gfx = pollster::block_on(Gfx::new(window.clone()))
            .context("failed to initialize graphics context")?;

        self.images.load_all(gfx.device(), gfx.queue())?;

        self.clock.reset();
        window.request_redraw();

        self.window = Some(window);
        self.gfx = Some(gfx);
        Ok(())
    }

    fn fail_init(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("startup failed: {err:#}");
        self.init_error = Some(err);
        self.running = false;
        event_loop.exit();
    }

    /// Runs one frame: timestep, full queue drain, scene update, draw-list
    /// flush, present. None of the steps is skipped when the scene list is
    /// empty; the frame still clears and presents.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        let timestep = self.clock.tick();

        // Drain until empty, re-checking each iteration, so events enqueued
        // while draining are still processed before the frame proceeds.
        while let Some(mut event) = self.queue.pop_front() {
            self.pointer.observe(event.data());
            route_event(&mut self.spec, &mut self.running, &mut event);
        }

        if !self.running {
            event_loop.exit();
            return;
        }

        let mut frame = match gfx.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                match gfx.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("fatal surface error; shutting down");
                        self.running = false;
                        event_loop.exit();
                    }
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {}
                }
                return;
            }
        };

        // Clear pass — dropped before the encoder is used by the renderers.
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("vitric clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        let size = logical_size(&window);
        self.draw_list.clear();

        let mut commands: Vec<RuntimeCommand> = Vec::new();

        if let Some(scene) = self.scenes.active_scene_mut() {
            let show_bar = self.spec.has_flag(AppFlags::CUSTOM_TITLE_BAR)
                && scene.spec().wants_custom_title_bar();

            let mut ctx = SceneCtx {
                canvas: Canvas::new(&mut self.draw_list, size, self.pointer.snapshot()),
                time: timestep,
                images: &self.images,
                spec: &self.spec,
                commands: &mut commands,
            };

            if show_bar {
                match self.title_bar.as_mut() {
                    Some(custom) => custom(&mut ctx),
                    None => draw_default_title_bar(&mut ctx),
                }
            }

            scene.on_render(&mut ctx);
        }

        let rctx = RenderCtx {
            device: gfx.device(),
            queue: gfx.queue(),
            surface_format: gfx.surface_format(),
            viewport: size,
        };

        {
            let mut target = RenderTarget {
                encoder: &mut frame.encoder,
                color_view: &frame.view,
            };
            self.rect_renderer.render(&rctx, &mut target, &mut self.draw_list);
            self.image_renderer.render(&rctx, &mut target, &mut self.draw_list);
        }

        window.pre_present_notify();
        gfx.submit(frame);

        self.pointer.end_frame();
        self.apply_commands(event_loop, commands, &window);
    }

    fn apply_commands(
        &mut self,
        event_loop: &ActiveEventLoop,
        commands: Vec<RuntimeCommand>,
        window: &Window,
    ) {
        for cmd in commands {
            match cmd {
                RuntimeCommand::ShowScene(name) => {
                    if let Some(directives) = self.scenes.show(&name, &self.spec.name) {
                        window.set_resizable(directives.resizable);
                        if let Some((w, h)) = directives.size {
                            let _ = window
                                .request_inner_size(LogicalSize::new(w as f64, h as f64));
                        }
                        window.set_title(&directives.title);
                    }
                }
                RuntimeCommand::Exit => self.running = false,
            }
        }

        if !self.running {
            event_loop.exit();
        }
    }

    fn enqueue(&mut self, data: EventData) {
        self.queue.push_back(Event::new(data));
    }
}

impl ApplicationHandler for RuntimeState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.fail_init(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.running {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; presentation paces the loop via vsync.
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if !self.running {
            event_loop.exit();
            return;
        }

        // Translation boundary: callbacks only enqueue typed events here; all
        // handling happens during the frame's drain step.
        match &event {
            WindowEvent::CloseRequested => {
                self.enqueue(EventData::WindowClose);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(gfx) = self.gfx.as_mut() {
                    gfx.resize(*new_size);
                }

                if let Some(window) = self.window.as_ref() {
                    let logical: LogicalSize<f64> = new_size.to_logical(window.scale_factor());
                    let (width, height) =
                        (logical.width.round() as u32, logical.height.round() as u32);
                    if width != self.spec.width || height != self.spec.height {
                        self.enqueue(EventData::WindowResize { width, height });
                    }
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(window), Some(gfx)) = (self.window.as_ref(), self.gfx.as_mut()) {
                    gfx.resize(window.inner_size());
                }
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let key = map_key(key_event.physical_key);
                match key_event.state {
                    ElementState::Pressed => {
                        self.enqueue(EventData::KeyPressed {
                            key,
                            repeat: key_event.repeat,
                        });
                        if let Some(text) = key_event.text.as_ref() {
                            for ch in text.chars() {
                                self.enqueue(EventData::KeyTyped { ch });
                            }
                        }
                    }
                    ElementState::Released => {
                        self.enqueue(EventData::KeyReleased { key });
                    }
                }
            }

            WindowEvent::Ime(winit::event::Ime::Commit(text)) => {
                for ch in text.chars() {
                    self.enqueue(EventData::KeyTyped { ch });
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = self.window.as_ref() {
                    let (x, y) = to_logical_f32(window, *position);
                    self.enqueue(EventData::MouseMoved { x, y });
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                    MouseScrollDelta::PixelDelta(p) => match self.window.as_ref() {
                        Some(window) => to_logical_f32(window, *p),
                        None => (p.x as f32, p.y as f32),
                    },
                };
                self.enqueue(EventData::MouseScrolled { dx, dy });
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_mouse_button(*button);
                match state {
                    ElementState::Pressed => {
                        self.enqueue(EventData::MouseButtonPressed { button });
                    }
                    ElementState::Released => {
                        self.enqueue(EventData::MouseButtonReleased { button });
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }

            _ => {}
        }

        if !self.running {
            event_loop.exit();
        }
    }
}

fn logical_size(window: &Window) -> Vec2 {
    let phys = window.inner_size();
    let scale = window.scale_factor();
    let logical: LogicalSize<f64> = phys.to_logical(scale);
    Vec2::new(logical.width as f32, logical.height as f32)
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let scale = window.scale_factor();
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::Escape => Key::Escape,
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Space => Key::Space,

            KeyCode::Insert => Key::Insert,
            KeyCode::Delete => Key::Delete,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,

            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,

            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
            KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
            KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

            KeyCode::KeyA => Key::A,
            KeyCode::KeyB => Key::B,
            KeyCode::KeyC => Key::C,
            KeyCode::KeyD => Key::D,
            KeyCode::KeyE => Key::E,
            KeyCode::KeyF => Key::F,
            KeyCode::KeyG => Key::G,
            KeyCode::KeyH => Key::H,
            KeyCode::KeyI => Key::I,
            KeyCode::KeyJ => Key::J,
            KeyCode::KeyK => Key::K,
            KeyCode::KeyL => Key::L,
            KeyCode::KeyM => Key::M,
            KeyCode::KeyN => Key::N,
            KeyCode::KeyO => Key::O,
            KeyCode::KeyP => Key::P,
            KeyCode::KeyQ => Key::Q,
            KeyCode::KeyR => Key::R,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyT => Key::T,
            KeyCode::KeyU => Key::U,
            KeyCode::KeyV => Key::V,
            KeyCode::KeyW => Key::W,
            KeyCode::KeyX => Key::X,
            KeyCode::KeyY => Key::Y,
            KeyCode::KeyZ => Key::Z,

            KeyCode::Digit0 => Key::Digit0,
            KeyCode::Digit1 => Key::Digit1,
            KeyCode::Digit2 => Key::Digit2,
            KeyCode::Digit3 => Key::Digit3,
            KeyCode::Digit4 => Key::Digit4,
            KeyCode::Digit5 => Key::Digit5,
            KeyCode::Digit6 => Key::Digit6,
            KeyCode::Digit7 => Key::Digit7,
            KeyCode::Digit8 => Key::Digit8,
            KeyCode::Digit9 => Key::Digit9,

            KeyCode::F1 => Key::F1,
            KeyCode::F2 => Key::F2,
            KeyCode::F3 => Key::F3,
            KeyCode::F4 => Key::F4,
            KeyCode::F5 => Key::F5,
            KeyCode::F6 => Key::F6,
            KeyCode::F7 => Key::F7,
            KeyCode::F8 => Key::F8,
            KeyCode::F9 => Key::F9,
            KeyCode::F10 => Key::F10,
            KeyCode::F11 => Key::F11,
            KeyCode::F12 => Key::F12,

            other => Key::Unknown(other as u32),
        },

        // NativeKeyCode has no stable numeric; preserve "unknown".
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppFlags;

    // Queue-drain semantics are exercised against the same primitives the
    // frame step uses; the winit half needs a live window and stays manual.

    fn drain(
        queue: &mut VecDeque<Event>,
        spec: &mut AppSpec,
        running: &mut bool,
        pointer: &mut PointerState,
    ) {
        while let Some(mut event) = queue.pop_front() {
            pointer.observe(event.data());
            route_event(spec, running, &mut event);
        }
    }

    #[test]
    fn drain_empties_the_queue_in_fifo_order() {
        let mut queue = VecDeque::new();
        queue.push_back(Event::new(EventData::MouseMoved { x: 1.0, y: 1.0 }));
        queue.push_back(Event::new(EventData::MouseMoved { x: 5.0, y: 5.0 }));

        let mut spec = AppSpec::new("Demo", 640, 480, AppFlags::empty());
        let mut running = true;
        let mut pointer = PointerState::default();

        drain(&mut queue, &mut spec, &mut running, &mut pointer);

        assert!(queue.is_empty());
        // Last-processed event wins: FIFO means the later move is current.
        assert_eq!(
            pointer.snapshot().pos,
            Some(crate::coords::Vec2::new(5.0, 5.0))
        );
    }

    #[test]
    fn close_mid_queue_does_not_stop_the_drain() {
        let mut queue = VecDeque::new();
        queue.push_back(Event::new(EventData::WindowClose));
        queue.push_back(Event::new(EventData::WindowResize {
            width: 320,
            height: 200,
        }));

        let mut spec = AppSpec::new("Demo", 640, 480, AppFlags::empty());
        let mut running = true;
        let mut pointer = PointerState::default();

        drain(&mut queue, &mut spec, &mut running, &mut pointer);

        assert!(!running);
        // The resize queued after the close was still processed.
        assert_eq!((spec.width, spec.height), (320, 200));
    }

    #[test]
    fn unknown_keys_map_to_a_stable_code() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Q);
        assert_eq!(
            map_mouse_button(WinitMouseButton::Other(9)),
            MouseButton::Other(9)
        );
    }
}
