//! Galaxy application implementing winit ApplicationHandler
//!
//! Frames are driven by redraw requests: the animation loop asks for the
//! next redraw at the end of every frame and stops asking once cancelled.

use nebula_render::{GalaxyRenderer, OrbitCamera, RenderContext};
use nebula_runtime::{FrameScheduler, GalaxyView, SystemClock, ViewConfig, Viewport};
use nebula_scene::LogTracker;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

type View = GalaxyView<SystemClock, OrbitCamera, GalaxyRenderer>;

/// Schedules the next frame as a window redraw
struct RedrawScheduler<'a>(&'a Window);

impl FrameScheduler for RedrawScheduler<'_> {
    fn request_frame(&mut self) {
        self.0.request_redraw();
    }
}

#[derive(Default)]
struct PointerState {
    last: Option<(f64, f64)>,
    rotating: bool,
    panning: bool,
}

pub struct GalaxyApp {
    pub config: ViewConfig,
    window: Option<Arc<Window>>,
    view: Option<View>,
    pointer: PointerState,
}

impl GalaxyApp {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            window: None,
            view: None,
            pointer: PointerState::default(),
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("[player] failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        if self.config.window.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        self.window = Some(window.clone());

        let target = match pollster::block_on(RenderContext::new(window.clone())) {
            Ok(context) => Some(GalaxyRenderer::new(context)),
            Err(e) => {
                log::error!("[player] {}", e);
                None
            }
        };

        let viewport = viewport_for(window.inner_size(), window.scale_factor());
        let mut camera = OrbitCamera::from_config(&self.config.camera, viewport.aspect());
        camera.viewport_height = window.inner_size().height as f32;

        let mounted = View::mount(
            target,
            camera,
            SystemClock::new(),
            viewport,
            &self.config,
            Box::new(LogTracker::new()),
        );
        match mounted {
            Ok(Some(mut view)) => {
                view.start(&mut RedrawScheduler(&window));
                self.view = Some(view);
            }
            Ok(None) => event_loop.exit(),
            Err(e) => {
                log::error!("[player] failed to mount galaxy view: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Stop the loop and release everything, then leave the event loop
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(view) = self.view.take() {
            view.teardown();
        }
        event_loop.exit();
    }

    fn resized(&mut self, size: PhysicalSize<u32>) {
        let (Some(window), Some(view)) = (&self.window, &mut self.view) else {
            return;
        };
        view.on_resize(viewport_for(size, window.scale_factor()));
        view.camera_mut().viewport_height = size.height as f32;
    }

    fn cursor_moved(&mut self, x: f64, y: f64) {
        let previous = self.pointer.last.replace((x, y));
        let (Some((px, py)), Some(view)) = (previous, &mut self.view) else {
            return;
        };
        let (dx, dy) = ((x - px) as f32, (y - py) as f32);
        if self.pointer.rotating {
            view.camera_mut().on_pointer_drag(dx, dy);
        } else if self.pointer.panning {
            view.camera_mut().on_pan_drag(dx, dy);
        }
    }
}

/// Logical viewport of a window from its physical size and scale factor
pub fn viewport_for(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    let logical = size.to_logical::<f64>(scale);
    Viewport::new(
        logical.width.round() as u32,
        logical.height.round() as u32,
        scale,
    )
}

impl ApplicationHandler for GalaxyApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.initialize(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => self.resized(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = self.window.clone() {
                    self.resized(window.inner_size());
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => self.shutdown(event_loop),
                    PhysicalKey::Code(KeyCode::KeyR) => {
                        if let Some(view) = &mut self.view {
                            if let Err(e) = view.regenerate() {
                                log::error!("[player] regeneration failed: {}", e);
                            }
                        }
                    }
                    _ => {}
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.pointer.rotating = pressed,
                    MouseButton::Right | MouseButton::Middle => self.pointer.panning = pressed,
                    _ => {}
                }
            }

            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position.x, position.y),

            WindowEvent::CursorLeft { .. } => self.pointer.last = None,

            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                if let Some(view) = &mut self.view {
                    view.camera_mut().on_wheel(notches);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(view)) = (&self.window, &mut self.view) {
                    view.frame(&mut RedrawScheduler(window));
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(view) = self.view.take() {
            view.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_uses_logical_size() {
        let vp = viewport_for(PhysicalSize::new(2560, 1440), 2.0);
        assert_eq!((vp.width, vp.height), (1280, 720));
        assert_eq!(vp.render_size(), (2560, 1440));
    }

    #[test]
    fn high_density_display_is_capped() {
        let vp = viewport_for(PhysicalSize::new(3000, 1500), 3.0);
        assert_eq!((vp.width, vp.height), (1000, 500));
        assert_eq!(vp.render_size(), (2000, 1000));
    }

    #[test]
    fn invalid_scale_factor_falls_back_to_one() {
        let vp = viewport_for(PhysicalSize::new(800, 600), 0.0);
        assert_eq!((vp.width, vp.height), (800, 600));
        assert_eq!(vp.pixel_ratio(), 1.0);
    }
}
