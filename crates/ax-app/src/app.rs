use std::sync::Arc;

use log::error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::window::{WindowAttributes, WindowId};

use crate::events::AxEvent;
use crate::state::AppState;

pub struct App {
    event_loop_proxy: Arc<EventLoopProxy<AxEvent>>,
    state: Option<AppState>,
    needs_redraw: bool,
}

impl App {
    pub fn new(event_loop: &mut EventLoop<AxEvent>) -> Self {
        let event_loop_proxy = Arc::new(event_loop.create_proxy());

        Self {
            event_loop_proxy,
            state: None,
            needs_redraw: false,
        }
    }
}

impl ApplicationHandler<AxEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = WindowAttributes::default()
            .with_title("Artifex")
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let state =
            pollster::block_on(AppState::new(window.clone(), self.event_loop_proxy.clone()))
                .unwrap();
        self.state = Some(state);
        self.needs_redraw = true;
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AxEvent) {
        if let Some(state) = &mut self.state {
            match event {
                AxEvent::Ui(e) => state.on_ui_event(e),
                AxEvent::Net(e) => state.on_net_event(e),
            }
            self.needs_redraw = true;
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        if state.window.id() != window_id {
            return;
        }

        // Let egui handle the event first
        let response = state.ui.egui_state.on_window_event(&state.window, &event);

        if response.repaint {
            self.needs_redraw = true;
            state.window.request_redraw();
        }

        // Orbit input goes through even when egui consumed the event,
        // as long as the pointer is over the viewport and not a panel.
        let handle_camera_input = match &event {
            WindowEvent::MouseInput { .. }
            | WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseWheel { .. } => !state.ui.egui_ctx.is_pointer_over_area(),
            _ => false,
        };

        if !response.consumed || handle_camera_input {
            match event {
                WindowEvent::CloseRequested => {
                    state.shutdown();
                    event_loop.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    state.resize(physical_size);
                    self.needs_redraw = true;
                }
                WindowEvent::RedrawRequested => {
                    if let Err(e) = state.render() {
                        error!("Render failed: {e}");
                    }
                    self.needs_redraw = false;
                }
                WindowEvent::DroppedFile(path) => {
                    if AppState::accepts_drop(&path) {
                        state.select_image(path);
                    }
                    self.needs_redraw = true;
                    state.window.request_redraw();
                }
                WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::MouseInput { .. } => {
                    if state.input(&event) {
                        self.needs_redraw = true;
                        state.window.request_redraw();
                    }
                }
                _ => {}
            }
        } else {
            // egui consumed the event, but button and cursor state
            // still have to reach the tracker: a release over a panel
            // would otherwise leave the drag stuck on.
            match event {
                WindowEvent::MouseInput { .. } | WindowEvent::CursorMoved { .. } => {
                    if state.input(&event) {
                        self.needs_redraw = true;
                        state.window.request_redraw();
                    }
                }
                _ => {}
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            // Keep frames flowing while a scene is open: the camera
            // smoothing converges over many ticks.
            if self.needs_redraw || state.viewer_wants_frames() {
                state.window.request_redraw();
            }
        }
    }
}
