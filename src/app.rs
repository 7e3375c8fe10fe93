use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{ModifiersState, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    config::EditorConfig,
    editor::{input::key_from_winit, EditorSession, InputEvent, KeyPress, MouseButton},
    gfx::{scene::Scene, RenderEngine},
    ui::{draw_overlay, UiManager},
};

/// Longest frame step fed to the session, so a stall does not teleport objects.
const MAX_FRAME_DT: f32 = 0.1;

/// Pixels per wheel line for touchpads reporting pixel deltas.
const PIXELS_PER_LINE: f32 = 24.0;

/// Window, renderer and UI around one [`EditorSession`].
pub struct EditorApp {
    config: EditorConfig,
    session: EditorSession,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    modifiers: ModifiersState,
    applied_cursor_mode: Option<bool>,
    last_frame: Instant,
    next_frame: Instant,
    frame_interval: Duration,
    error: Option<anyhow::Error>,
}

/// Opens the editor window on `scene` and runs until the user quits.
pub fn run(config: EditorConfig, scene: Scene, scene_file: PathBuf) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = EditorApp::new(config, scene, scene_file);
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated with an error")?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

impl EditorApp {
    pub fn new(config: EditorConfig, scene: Scene, scene_file: PathBuf) -> Self {
        let session = EditorSession::new(
            &config,
            scene,
            scene_file,
            config.window.width as f32,
            config.window.height as f32,
        );
        let fps = config.editor.target_fps.max(1);
        let now = Instant::now();

        Self {
            config,
            session,
            window: None,
            render_engine: None,
            ui_manager: None,
            modifiers: ModifiersState::empty(),
            applied_cursor_mode: None,
            last_frame: now,
            next_frame: now,
            frame_interval: Duration::from_secs_f64(1.0 / fps as f64),
            error: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );

        let size = window.inner_size();
        let render_engine =
            pollster::block_on(RenderEngine::new(window.clone(), size.width, size.height))
                .context("Failed to initialize renderer")?;

        let ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );

        self.session.resize(size.width as f32, size.height as f32);
        self.window = Some(window);
        self.render_engine = Some(render_engine);
        self.ui_manager = Some(ui_manager);
        self.sync_cursor();
        Ok(())
    }

    /// Grabs or releases the pointer to match the session's cursor mode.
    fn sync_cursor(&mut self) {
        let cursor_mode = self.session.cursor_mode();
        if self.applied_cursor_mode == Some(cursor_mode) {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if cursor_mode {
            if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Failed to release cursor: {}", err);
            }
            window.set_cursor_visible(true);

            let size = window.inner_size();
            let center = PhysicalPosition::new(size.width as f64 * 0.5, size.height as f64 * 0.5);
            if let Err(err) = window.set_cursor_position(center) {
                log::debug!("Cannot warp cursor: {}", err);
            }
            self.session.handle_event(InputEvent::CursorMoved {
                x: center.x as f32,
                y: center.y as f32,
            });
        } else {
            let grab = window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
            if let Err(err) = grab {
                log::warn!("Cursor grab unavailable: {}", err);
            }
            window.set_cursor_visible(false);
        }

        self.applied_cursor_mode = Some(cursor_mode);
    }

    fn handle_keyboard(&mut self, event: winit::event::KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let key = key_from_winit(code);

        match event.state {
            ElementState::Pressed => {
                // Auto-repeat only matters for typing.
                if event.repeat && !self.session.has_text_focus() {
                    return;
                }
                let text = event
                    .text
                    .as_ref()
                    .and_then(|text| text.chars().next())
                    .filter(|c| !c.is_control());
                self.session.handle_event(InputEvent::KeyDown(KeyPress {
                    key,
                    text,
                    ctrl: self.modifiers.control_key(),
                }));
            }
            ElementState::Released => self.session.handle_event(InputEvent::KeyUp(key)),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.resize(width, height);
        }
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            ui_manager.update_display_size(width, height);
        }
        self.session
            .handle_event(InputEvent::Resized { width, height });
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_engine), Some(ui_manager)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };

        let hud = self.session.hud_state();
        let widgets = self.session.panel_widgets();
        let cursor = self.session.cursor();
        let highlight = self.session.highlighted();

        let (scene, scenery, camera_uniform, lights) = self.session.render_data();
        render_engine.prepare(scene, scenery, camera_uniform, &lights);

        let result = render_engine.render_frame(
            self.session.scene(),
            self.session.scenery().meshes(),
            highlight,
            Some(
                |device: &wgpu::Device,
                 queue: &wgpu::Queue,
                 encoder: &mut wgpu::CommandEncoder,
                 view: &wgpu::TextureView| {
                    ui_manager.draw(device, queue, encoder, window, view, |ui| {
                        draw_overlay(ui, &hud, &widgets, cursor);
                    });
                },
            ),
        );

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(err) => log::warn!("Dropped frame: {}", err),
        }
    }

    fn after_input(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.quit_requested() {
            event_loop.exit();
            return;
        }
        self.sync_cursor();
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            log::error!("Startup failed: {:#}", err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_keyboard(event),
            WindowEvent::CursorMoved { position, .. } => {
                self.session.handle_event(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    _ => return,
                };
                self.session.handle_event(InputEvent::MouseDown(button));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                self.session.handle_event(InputEvent::Wheel { lines });
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::Focused(false) => self.session.handle_event(InputEvent::FocusLost),
            WindowEvent::RedrawRequested => self.render(event_loop),
            _ => {}
        }

        self.after_input(event_loop);
    }

    fn device_event(&mut self, event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.session.handle_event(InputEvent::MouseMotion {
                dx: dx as f32,
                dy: dy as f32,
            });
            self.after_input(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT);
            self.last_frame = now;
            self.session.tick(dt);

            if let Some(window) = self.window.as_ref() {
                window.request_redraw();
            }
            self.next_frame = now + self.frame_interval;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Shutting down");
        self.session.destroy();
        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.release_textures();
        }
    }
}
