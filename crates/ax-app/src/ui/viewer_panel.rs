use ax_viewer::ViewerStatus;
use egui::{Color32, Context, RichText};

use crate::ui::{UiComponent, UiContext, UiEvent};

/// Floating toolbar over the 3D viewport. Only shown while a model is open.
#[derive(Default)]
pub struct ViewerPanel;

impl UiComponent for ViewerPanel {
    fn show(&mut self, ctx: &Context, ui_ctx: &mut UiContext) {
        let Some(view) = ui_ctx.viewer.clone() else {
            return;
        };

        egui::Window::new("viewer_toolbar")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 12.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&view.label).strong());
                    ui.separator();

                    if ui.button("➖").on_hover_text("Zoom out").clicked() {
                        ui_ctx.send_event(UiEvent::ZoomOut);
                    }
                    ui.add_sized(
                        egui::vec2(56.0, 18.0),
                        egui::Label::new(format!("{:.0}%", view.zoom_percent)),
                    );
                    if ui.button("➕").on_hover_text("Zoom in").clicked() {
                        ui_ctx.send_event(UiEvent::ZoomIn);
                    }
                    if ui.button("🔄").on_hover_text("Reset view").clicked() {
                        ui_ctx.send_event(UiEvent::ResetCamera);
                    }

                    ui.separator();
                    if ui.button("✖").on_hover_text("Close viewer").clicked() {
                        ui_ctx.send_event(UiEvent::CloseViewer);
                    }
                });

                match &view.status {
                    ViewerStatus::Initializing => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading 3D model…");
                        });
                    }
                    ViewerStatus::Failed(message) => {
                        ui.colored_label(Color32::LIGHT_RED, message);
                    }
                    ViewerStatus::Ready => {
                        if view.substituted {
                            ui.label(
                                RichText::new("Preview unavailable, showing placeholder")
                                    .small()
                                    .color(Color32::GRAY),
                            );
                        }
                        ui.label(
                            RichText::new("Drag to rotate • Scroll to zoom")
                                .small()
                                .color(Color32::GRAY),
                        );
                    }
                }
            });
    }
}
