use std::path::Path;
use std::sync::Arc;

use egui_wgpu::wgpu;
use egui_wgpu::wgpu::StoreOp;
use log::{info, warn};
use winit::event::WindowEvent;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use ax_core::GenerationResult;
use ax_viewer::{MeshRenderer, RenderRuntime, ViewerSession, ViewerStatus};

use crate::client::GenClient;
use crate::config::AppConfig;
use crate::events::{AxEvent, NetEvent};
use crate::form::{GenRequest, SelectedImage};
use crate::gfx::GfxState;
use crate::net_worker::{NetCommand, NetWorker};
use crate::ui;
use crate::ui::{ResultCard, UiEvent, UiState, ViewerView};

/// One open 3D scene: the session state machine plus its GPU-side
/// renderer once the mesh is available.
pub struct ViewerScene {
    pub session: ViewerSession,
    pub renderer: Option<MeshRenderer>,
}

/// Pointer bookkeeping for orbit drags. Button state has to stay in
/// sync even for events egui consumes, or a release over a panel
/// leaves a phantom drag that rotates the model with no button held.
#[derive(Debug, Default)]
pub struct DragTracker {
    pressed: bool,
    last_pos: Option<(f32, f32)>,
}

impl DragTracker {
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
        if !pressed {
            self.last_pos = None;
        }
    }

    /// Record the cursor position; returns the drag delta when the
    /// button is down and a previous position exists.
    pub fn on_cursor(&mut self, pos: (f32, f32)) -> Option<(f32, f32)> {
        let delta = match (self.pressed, self.last_pos) {
            (true, Some((lx, ly))) => Some((pos.0 - lx, pos.1 - ly)),
            _ => None,
        };
        self.last_pos = Some(pos);
        delta
    }
}

pub struct AppState {
    pub(crate) window: Arc<Window>,

    pub gfx: GfxState,
    pub ui: UiState,

    client: GenClient,
    net: NetWorker,

    // Created on first viewer open, then reused for every scene.
    runtime: Option<Arc<RenderRuntime>>,
    pub viewer: Option<ViewerScene>,

    // Mouse state for orbit dragging
    drag: DragTracker,
}

impl AppState {
    pub async fn new(
        window: Arc<Window>,
        event_loop_proxy: Arc<EventLoopProxy<AxEvent>>,
    ) -> anyhow::Result<Self> {
        let config = AppConfig::load();
        info!("Backend: {}", config.backend_url);

        let client = GenClient::new(&config.backend_url);
        let net = NetWorker::new(client.clone(), event_loop_proxy.clone());

        let gfx = GfxState::new(window.clone()).await?;
        let mut ui_state = UiState::new(&gfx, window.clone(), event_loop_proxy);

        ui_state.add_component(Box::new(ui::CentralPanel::default()));
        ui_state.add_component(Box::new(ui::SidePanel::default()));
        ui_state.add_component(Box::new(ui::TopPanel::default()));
        ui_state.add_component(Box::new(ui::GalleryPanel::default()));
        ui_state.add_component(Box::new(ui::ViewerPanel));

        Ok(Self {
            window,
            gfx,
            ui: ui_state,
            client,
            net,
            runtime: None,
            viewer: None,
            drag: DragTracker::default(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            if let Some(scene) = &mut self.viewer {
                scene.session.camera.aspect_ratio =
                    new_size.width as f32 / new_size.height as f32;
            }
        }
    }

    /// Orbit input. Only moves the camera while a scene is rendering,
    /// but button state is tracked unconditionally so a release that
    /// egui consumed still ends the drag.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        use winit::event::{ElementState, MouseScrollDelta};

        if let WindowEvent::MouseInput { state, .. } = event {
            self.drag.set_pressed(*state == ElementState::Pressed);
        }

        let Some(scene) = &mut self.viewer else {
            return false;
        };
        if !scene.session.is_ready() {
            return false;
        }

        match event {
            WindowEvent::MouseInput { .. } => true,

            WindowEvent::CursorMoved { position, .. } => {
                let pos = (position.x as f32, position.y as f32);
                match self.drag.on_cursor(pos) {
                    Some((dx, dy)) => {
                        scene.session.camera.apply_drag(dx, dy);
                        true
                    }
                    None => false,
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                // Map to the browser wheel convention: positive delta
                // moves the camera away.
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * 100.0,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                scene.session.camera.apply_wheel(delta);
                true
            }

            _ => false,
        }
    }

    pub fn on_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ModeChanged(mode) => {
                self.ui.ui_ctx.mode = mode;
            }

            UiEvent::Submit => {
                let mode = self.ui.ui_ctx.mode;
                if let Some(request) = self.ui.ui_ctx.form.begin_submit(mode) {
                    self.ui.ui_ctx.status = match &request {
                        GenRequest::Image { .. } => "Generating image…".into(),
                        GenRequest::ModelFromText { .. } | GenRequest::ModelFromImage { .. } => {
                            "Generating 3D model, this can take a few minutes…".into()
                        }
                    };
                    self.net.send(NetCommand::Generate(request));
                }
            }

            UiEvent::PickImage => {
                let picked = rfd::FileDialog::new()
                    .add_filter("Images", &["png", "jpg", "jpeg", "webp"])
                    .pick_file();
                if let Some(path) = picked {
                    self.select_image(path);
                }
            }

            UiEvent::RemoveImage => {
                self.ui.ui_ctx.form.remove_image();
                self.ui.ui_ctx.selection_preview = None;
            }

            UiEvent::OpenViewer {
                request_id,
                filename,
            } => self.open_viewer(&request_id, &filename),

            UiEvent::CloseViewer => {
                self.viewer = None;
                self.ui.ui_ctx.viewer = None;
            }

            UiEvent::DownloadArtifact {
                request_id,
                filename,
            } => {
                let url = self.client.download_url(&request_id, &filename);
                self.save_to_disk(url, &filename);
            }

            UiEvent::DownloadImage { url } => {
                let filename = url
                    .rsplit('/')
                    .next()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("image.png")
                    .to_string();
                let url = self.client.absolute(&url);
                self.save_to_disk(url, &filename);
            }

            UiEvent::ResetCamera => {
                if let Some(scene) = &mut self.viewer {
                    scene.session.camera.reset();
                }
            }
            UiEvent::ZoomIn => {
                if let Some(scene) = &mut self.viewer {
                    scene.session.camera.zoom_in();
                }
            }
            UiEvent::ZoomOut => {
                if let Some(scene) = &mut self.viewer {
                    scene.session.camera.zoom_out();
                }
            }
        }
    }

    pub fn on_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::GenerationFinished(Ok(result)) => {
                self.ui.ui_ctx.form.complete();
                self.ui.ui_ctx.selection_preview = None;
                self.ui.ui_ctx.status = if result.has_model_files() {
                    format!("3D model ready in {:.1}s", result.processing_time)
                } else {
                    "Image ready".into()
                };
                self.push_result(result);
            }

            NetEvent::GenerationFinished(Err(error)) => {
                warn!("Generation failed: {error}");
                self.ui.ui_ctx.form.fail(error.to_string());
                self.ui.ui_ctx.status = "Generation failed".into();
            }

            NetEvent::PreviewFetched { result_id, bytes } => match bytes {
                Ok(bytes) => {
                    let name = format!("preview-{result_id}");
                    match self.load_texture(&name, &bytes) {
                        Ok(texture) => {
                            if let Some(card) = self
                                .ui
                                .ui_ctx
                                .results
                                .iter_mut()
                                .find(|c| c.result.id == result_id)
                            {
                                card.preview = Some(texture);
                            }
                        }
                        Err(error) => warn!("Undecodable preview for {result_id}: {error}"),
                    }
                }
                Err(error) => warn!("Preview fetch failed for {result_id}: {error}"),
            },

            NetEvent::AssetFetched { url, bytes } => self.on_asset_fetched(&url, bytes),

            NetEvent::DownloadFinished { filename, result } => match result {
                Ok(path) => {
                    self.ui.ui_ctx.status = format!("Saved {} to {}", filename, path.display());
                }
                Err(error) => {
                    self.ui.ui_ctx.status = format!("Download failed: {error}");
                }
            },
        }
    }

    fn push_result(&mut self, result: GenerationResult) {
        if let Some(url) = result.image_url.clone() {
            self.net.send(NetCommand::FetchPreview {
                result_id: result.id,
                url,
            });
        }
        self.ui.ui_ctx.results.push(ResultCard {
            result,
            preview: None,
        });
    }

    /// Entry point for both the file picker and window drag-and-drop.
    pub fn select_image(&mut self, path: std::path::PathBuf) {
        use crate::form::Mode;

        if self.ui.ui_ctx.mode != Mode::Model {
            return;
        }

        let image = SelectedImage::new(path.clone());
        match std::fs::read(&path) {
            Ok(bytes) => match self.load_texture("selection", &bytes) {
                Ok(texture) => self.ui.ui_ctx.selection_preview = Some(texture),
                Err(error) => {
                    warn!("No preview for {}: {error}", path.display());
                    self.ui.ui_ctx.selection_preview = None;
                }
            },
            Err(error) => {
                self.ui.ui_ctx.form.fail(format!(
                    "Could not read {}: {error}",
                    path.display()
                ));
                return;
            }
        }
        self.ui.ui_ctx.form.select_image(image);
    }

    fn load_texture(&self, name: &str, bytes: &[u8]) -> anyhow::Result<egui::TextureHandle> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let size = [decoded.width() as usize, decoded.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, decoded.as_raw());
        Ok(self
            .ui
            .egui_ctx
            .load_texture(name, color_image, egui::TextureOptions::LINEAR))
    }

    fn open_viewer(&mut self, request_id: &str, filename: &str) {
        let url = self.client.download_url(request_id, filename);
        let mut session = ViewerSession::open(&url, filename);

        let size = self.window.inner_size();
        if size.height > 0 {
            session.camera.aspect_ratio = size.width as f32 / size.height as f32;
        }

        if self.runtime.is_none() {
            match RenderRuntime::new(
                self.gfx.device.clone(),
                self.gfx.queue.clone(),
                self.gfx.config.format,
            ) {
                Ok(runtime) => self.runtime = Some(Arc::new(runtime)),
                Err(error) => {
                    warn!("Render runtime bootstrap failed: {error}");
                    session.bootstrap_failed(format!("Failed to initialize 3D viewer: {error}"));
                }
            }
        }

        if !matches!(session.status, ViewerStatus::Failed(_)) {
            self.net.send(NetCommand::FetchAsset { url });
        }

        self.viewer = Some(ViewerScene {
            session,
            renderer: None,
        });
    }

    fn on_asset_fetched(&mut self, url: &str, bytes: Result<Vec<u8>, String>) {
        let runtime = self.runtime.clone();
        let Some(scene) = &mut self.viewer else {
            return;
        };
        // A stale fetch for a scene that was closed and reopened.
        if scene.session.asset_url != url {
            return;
        }
        if matches!(scene.session.status, ViewerStatus::Failed(_)) {
            return;
        }

        let mesh = match bytes {
            Ok(bytes) => scene.session.asset_loaded(&bytes),
            Err(error) => {
                warn!("Asset fetch failed for {url}: {error}");
                scene.session.asset_unavailable()
            }
        };
        scene.renderer = runtime.map(|rt| MeshRenderer::new(rt, mesh));
    }

    fn save_to_disk(&mut self, url: String, filename: &str) {
        let picked = rfd::FileDialog::new().set_file_name(filename).save_file();
        if let Some(dest) = picked {
            self.ui.ui_ctx.status = format!("Downloading {filename}…");
            self.net.send(NetCommand::Download { url, dest });
        }
    }

    pub fn viewer_wants_frames(&self) -> bool {
        self.viewer
            .as_ref()
            .is_some_and(|scene| scene.session.wants_frames())
    }

    /// Mirror the viewer session into the read model the panels use.
    fn sync_viewer_view(&mut self) {
        self.ui.ui_ctx.viewer = self.viewer.as_ref().map(|scene| ViewerView {
            label: scene.session.label.clone(),
            status: scene.session.status.clone(),
            zoom_percent: scene.session.camera.zoom_percent(),
            substituted: scene.session.substituted,
        });
    }

    pub fn render(&mut self) -> anyhow::Result<()> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }

        if let Some(scene) = &mut self.viewer {
            if scene.session.is_ready() {
                scene.session.camera.tick();
            }
        }
        self.sync_viewer_view();

        let output = self.gfx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // 3D scene
        let drew_scene = match &self.viewer {
            Some(scene) if scene.session.is_ready() => match &scene.renderer {
                Some(renderer) => {
                    renderer.render(
                        &mut encoder,
                        &view,
                        &self.gfx.depth_view,
                        &scene.session.camera,
                    );
                    true
                }
                None => false,
            },
            _ => false,
        };

        if !drew_scene {
            let _ = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.04,
                            g: 0.04,
                            b: 0.07,
                            a: 1.0,
                        }),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
        }

        // UI
        let full_output = self.ui.draw(&self.window);

        let platform_output = full_output.platform_output.clone();
        self.ui
            .egui_state
            .handle_platform_output(&self.window, platform_output);

        let shapes = full_output.shapes.clone();
        let pixels_per_point = full_output.pixels_per_point;
        let paint_jobs = self.ui.egui_ctx.tessellate(shapes, pixels_per_point);

        let screen_desc = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.ui
                .egui_renderer
                .update_texture(&self.gfx.device, &self.gfx.queue, *id, delta);
        }

        self.ui.egui_renderer.update_buffers(
            &self.gfx.device,
            &self.gfx.queue,
            &mut encoder,
            &paint_jobs,
            &screen_desc,
        );

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            self.ui
                .egui_renderer
                .render(&mut rpass.forget_lifetime(), &paint_jobs, &screen_desc);
        }

        for id in &full_output.textures_delta.free {
            self.ui.egui_renderer.free_texture(id);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.net.shutdown();
    }
}

impl AppState {
    /// Whether the dropped path looks like an image we can use as
    /// model input.
    pub fn accepts_drop(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                matches!(
                    e.to_ascii_lowercase().as_str(),
                    "png" | "jpg" | "jpeg" | "webp"
                )
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_filter_matches_image_extensions() {
        assert!(AppState::accepts_drop(Path::new("/tmp/photo.PNG")));
        assert!(AppState::accepts_drop(Path::new("a.jpeg")));
        assert!(!AppState::accepts_drop(Path::new("model.obj")));
        assert!(!AppState::accepts_drop(Path::new("noext")));
    }

    #[test]
    fn drag_needs_press_and_previous_position() {
        let mut drag = DragTracker::default();
        // Hover moves record the anchor but never produce deltas.
        assert_eq!(drag.on_cursor((10.0, 10.0)), None);
        assert_eq!(drag.on_cursor((12.0, 11.0)), None);

        drag.set_pressed(true);
        assert_eq!(drag.on_cursor((15.0, 9.0)), Some((3.0, -2.0)));
    }

    #[test]
    fn release_over_a_panel_ends_the_drag() {
        let mut drag = DragTracker::default();
        drag.set_pressed(true);
        drag.on_cursor((0.0, 0.0));
        assert_eq!(drag.on_cursor((5.0, 0.0)), Some((5.0, 0.0)));

        // The release happens while the pointer is over egui, so no
        // cursor positions come in between.
        drag.set_pressed(false);

        // Moving back over the viewport must not rotate.
        assert_eq!(drag.on_cursor((100.0, 100.0)), None);
        assert_eq!(drag.on_cursor((120.0, 120.0)), None);

        // A fresh press drags from the last hover position.
        drag.set_pressed(true);
        assert_eq!(drag.on_cursor((121.0, 121.0)), Some((1.0, 1.0)));
    }
}
