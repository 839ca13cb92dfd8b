use egui::{Color32, Context, RichText};

use crate::ui::{UiComponent, UiContext};

/// Transparent viewport area. The 3D scene renders underneath the UI,
/// so this panel only claims the space and shows idle hints.
#[derive(Default)]
pub struct CentralPanel {}

impl UiComponent for CentralPanel {
    fn show(&mut self, ctx: &Context, ui_ctx: &mut UiContext) {
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(Color32::TRANSPARENT))
            .show(ctx, |ui| {
                // Always allocate space to prevent zero-size viewport issues
                ui.allocate_space(ui.available_size());

                if ui_ctx.viewer.is_none() {
                    egui::Area::new(egui::Id::new("viewport_hints"))
                        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                        .interactable(false)
                        .show(ctx, |ui| {
                            ui.vertical_centered(|ui| {
                                ui.label(RichText::new("🧊").size(56.0));
                                ui.label(
                                    RichText::new("Describe something and hit Generate.")
                                        .color(Color32::GRAY),
                                );
                                ui.label(
                                    RichText::new("3D results open here, drag to rotate.")
                                        .small()
                                        .color(Color32::DARK_GRAY),
                                );
                            });
                        });
                }
            });
    }
}
