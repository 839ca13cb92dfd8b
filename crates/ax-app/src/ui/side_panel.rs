use egui::{Color32, Context, RichText, TextEdit};

use crate::form::Mode;
use crate::ui::{UiComponent, UiContext, UiEvent};

/// The generation request form: prompt, image selection (3D mode) and
/// the submit button.
#[derive(Default)]
pub struct SidePanel {}

impl SidePanel {
    fn image_zone(&self, ui: &mut egui::Ui, ui_ctx: &UiContext) {
        ui.heading(RichText::new("🖼 Input Image").size(16.0));
        ui.add_space(5.0);

        match &ui_ctx.form.selection.image {
            Some(image) => {
                if let Some(texture) = &ui_ctx.selection_preview {
                    ui.image((texture.id(), egui::vec2(96.0, 96.0)));
                }
                ui.label(&image.name);
                if ui
                    .add_enabled(!ui_ctx.form.busy, egui::Button::new("Remove"))
                    .clicked()
                {
                    ui_ctx.send_event(UiEvent::RemoveImage);
                }
            }
            None => {
                ui.label(
                    RichText::new("Drop an image onto the window, or:")
                        .small()
                        .color(Color32::GRAY),
                );
                if ui
                    .add_enabled(!ui_ctx.form.busy, egui::Button::new("📁 Choose image…"))
                    .clicked()
                {
                    ui_ctx.send_event(UiEvent::PickImage);
                }
                ui.label(
                    RichText::new("Or use a text description below")
                        .small()
                        .color(Color32::GRAY),
                );
            }
        }
        ui.separator();
    }

    fn examples(&self, ui: &mut egui::Ui, ui_ctx: &mut UiContext) {
        let examples: &[&str] = match ui_ctx.mode {
            Mode::Image => &[
                "a sunset over snowy mountains",
                "a watercolor fox in a forest",
                "a neon-lit rainy street",
            ],
            Mode::Model => &[
                "a futuristic robot with blue armor",
                "a wooden sailing ship",
                "a modern sports car",
            ],
        };

        ui.collapsing("💡 Example Prompts", |ui| {
            for example in examples {
                if ui.button(*example).clicked() {
                    ui_ctx.form.selection.prompt = example.to_string();
                }
            }
        });
    }
}

impl UiComponent for SidePanel {
    fn show(&mut self, ctx: &Context, ui_ctx: &mut UiContext) {
        egui::SidePanel::left("side_panel")
            .default_width(340.0)
            .show(ctx, |ui| {
                ui.heading(ui_ctx.mode.title());
                ui.add_space(5.0);
                ui.label(
                    RichText::new(match ui_ctx.mode {
                        Mode::Image => "Create images from text descriptions",
                        Mode::Model => "Create 3D models from text or an input image",
                    })
                    .small()
                    .color(Color32::LIGHT_BLUE),
                );
                ui.separator();

                if let Some(error) = &ui_ctx.form.error {
                    egui::Frame::new()
                        .fill(Color32::from_rgb(60, 20, 20))
                        .inner_margin(8.0)
                        .corner_radius(5.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new(error).color(Color32::LIGHT_RED));
                        });
                    ui.separator();
                }

                if ui_ctx.mode == Mode::Model {
                    self.image_zone(ui, ui_ctx);
                }

                ui.heading(RichText::new("✨ Text Prompt").size(16.0));
                ui.add_space(5.0);

                let text_edit = TextEdit::multiline(&mut ui_ctx.form.selection.prompt)
                    .desired_width(f32::INFINITY)
                    .desired_rows(3)
                    .hint_text(match ui_ctx.mode {
                        Mode::Image => "Describe the image you want to generate…",
                        Mode::Model => "Describe the 3D model you want to generate…",
                    });
                ui.add_enabled(!ui_ctx.form.busy, text_edit);
                ui.add_space(8.0);

                let can_submit = ui_ctx.form.can_submit(ui_ctx.mode);
                let label = if ui_ctx.form.busy {
                    "⏳ Generating…"
                } else {
                    "🎨 Generate"
                };
                let generate = ui.add_enabled(
                    can_submit,
                    egui::Button::new(RichText::new(label).size(14.0))
                        .min_size(egui::vec2(ui.available_width(), 30.0)),
                );
                if generate.clicked() {
                    ui_ctx.send_event(UiEvent::Submit);
                }

                ui.separator();
                self.examples(ui, ui_ctx);

                if ui_ctx.viewer.is_some() {
                    ui.separator();
                    ui.heading("🎮 Camera Controls");
                    ui.label("• Left drag: Rotate");
                    ui.label("• Mouse wheel: Zoom");
                    if ui.button("🔄 Reset Camera").clicked() {
                        ui_ctx.send_event(UiEvent::ResetCamera);
                    }
                }
            });
    }
}
