mod central_panel;
mod gallery_panel;
mod side_panel;
mod top_panel;
mod viewer_panel;

pub use central_panel::CentralPanel;
pub use gallery_panel::GalleryPanel;
pub use side_panel::SidePanel;
pub use top_panel::TopPanel;
pub use viewer_panel::ViewerPanel;

use std::sync::Arc;

use egui::Context;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use ax_core::GenerationResult;
use ax_viewer::ViewerStatus;

use crate::events::AxEvent;
use crate::form::{FormState, Mode};
use crate::gfx::GfxState;

#[derive(Debug, Clone)]
pub enum UiEvent {
    ModeChanged(Mode),
    Submit,
    /// Open the native file picker for an input image.
    PickImage,
    RemoveImage,
    OpenViewer {
        request_id: String,
        filename: String,
    },
    CloseViewer,
    DownloadArtifact {
        request_id: String,
        filename: String,
    },
    /// Download a generated image (text-to-image results).
    DownloadImage {
        url: String,
    },
    ResetCamera,
    ZoomIn,
    ZoomOut,
}

/// One gallery entry: the immutable result plus its preview texture
/// once the bytes have arrived.
pub struct ResultCard {
    pub result: GenerationResult,
    pub preview: Option<egui::TextureHandle>,
}

/// Read model of the open viewer session for the overlay panel.
#[derive(Debug, Clone)]
pub struct ViewerView {
    pub label: String,
    pub status: ViewerStatus,
    pub zoom_percent: f32,
    pub substituted: bool,
}

/// Shared state the panels render from and mutate. Actions that touch
/// anything outside the UI go through [`UiEvent`]s instead.
pub struct UiContext {
    pub mode: Mode,
    pub form: FormState,
    pub selection_preview: Option<egui::TextureHandle>,
    /// Append-only, insertion order = completion order.
    pub results: Vec<ResultCard>,
    pub viewer: Option<ViewerView>,
    pub status: String,
    event_loop_proxy: Arc<EventLoopProxy<AxEvent>>,
}

impl UiContext {
    pub fn new(event_loop_proxy: Arc<EventLoopProxy<AxEvent>>) -> Self {
        Self {
            mode: Mode::default(),
            form: FormState::default(),
            selection_preview: None,
            results: Vec::new(),
            viewer: None,
            status: "Ready".into(),
            event_loop_proxy,
        }
    }

    pub fn send_event(&self, event: UiEvent) {
        self.event_loop_proxy.send_event(AxEvent::Ui(event)).unwrap();
    }
}

pub struct UiState {
    pub(crate) egui_state: egui_winit::State,
    pub(crate) egui_ctx: egui::Context,
    pub(crate) egui_renderer: egui_wgpu::Renderer,

    components: Vec<Box<dyn UiComponent>>,
    pub(crate) ui_ctx: UiContext,
}

impl UiState {
    pub fn new(
        gfx: &GfxState,
        window: Arc<Window>,
        event_loop_proxy: Arc<EventLoopProxy<AxEvent>>,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gfx.device,
            gfx.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            components: Vec::new(),
            ui_ctx: UiContext::new(event_loop_proxy),
        }
    }

    pub fn draw(&mut self, window: &Window) -> egui::FullOutput {
        let raw_input = self.egui_state.take_egui_input(window);

        self.egui_ctx.run(raw_input, |ctx| {
            for component in self.components.iter_mut() {
                component.show(ctx, &mut self.ui_ctx);
            }
        })
    }

    pub fn add_component(&mut self, component: Box<dyn UiComponent>) {
        self.components.push(component);
    }
}

pub trait UiComponent {
    fn show(&mut self, ctx: &Context, ui_ctx: &mut UiContext);
}
