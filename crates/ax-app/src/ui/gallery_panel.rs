use egui::{Color32, Context, RichText, Ui};

use crate::ui::{ResultCard, UiComponent, UiContext, UiEvent};

/// Accumulated results of the session, newest at the bottom. Cards are
/// append-only: no edit, no delete.
#[derive(Default)]
pub struct GalleryPanel {
    stick_to_bottom: bool,
}

impl GalleryPanel {
    fn show_card(&self, ui: &mut Ui, ui_ctx: &UiContext, card: &ResultCard) {
        let result = &card.result;

        egui::Frame::new()
            .fill(Color32::from_gray(30))
            .corner_radius(5.0)
            .inner_margin(10.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(60)))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    match &card.preview {
                        Some(texture) => {
                            ui.image((texture.id(), egui::vec2(96.0, 96.0)));
                        }
                        None if result.image_url.is_some() => {
                            ui.add_sized(egui::vec2(96.0, 96.0), egui::Spinner::new());
                        }
                        None => {
                            ui.add_sized(
                                egui::vec2(96.0, 96.0),
                                egui::Label::new(RichText::new("📦").size(48.0)),
                            );
                        }
                    }

                    ui.add_space(5.0);

                    ui.vertical(|ui| {
                        ui.label(RichText::new(&result.prompt).strong());

                        if result.has_model_files() {
                            ui.label(
                                RichText::new(format!(
                                    "Processing time: {:.1}s • {} file(s)",
                                    result.processing_time,
                                    result.files.len()
                                ))
                                .small()
                                .color(Color32::GRAY),
                            );
                        }

                        ui.label(
                            RichText::new(format!(
                                "{} • ID: {}",
                                result.timestamp.format("%H:%M:%S"),
                                short_id(&result.request_id)
                            ))
                            .small()
                            .color(Color32::GRAY),
                        );
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if result.has_model_files() {
                            for file in &result.files {
                                if ui
                                    .button(format!("⬇ {}", extension_label(&file.filename)))
                                    .clicked()
                                {
                                    ui_ctx.send_event(UiEvent::DownloadArtifact {
                                        request_id: result.request_id.clone(),
                                        filename: file.filename.clone(),
                                    });
                                }
                                if ui.button("👁 View 3D").clicked() {
                                    ui_ctx.send_event(UiEvent::OpenViewer {
                                        request_id: result.request_id.clone(),
                                        filename: file.filename.clone(),
                                    });
                                }
                            }
                        } else if let Some(url) = &result.image_url {
                            if ui.button("⬇ PNG").clicked() {
                                ui_ctx.send_event(UiEvent::DownloadImage { url: url.clone() });
                            }
                        }
                    });
                });
            });

        ui.add_space(5.0);
    }
}

// Truncates on a char boundary; the id is backend-supplied text.
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((index, _)) => &id[..index],
        None => id,
    }
}

fn extension_label(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_uppercase())
        .unwrap_or_else(|| "FILE".to_string())
}

impl UiComponent for GalleryPanel {
    fn show(&mut self, ctx: &Context, ui_ctx: &mut UiContext) {
        if ui_ctx.results.is_empty() {
            return;
        }

        egui::TopBottomPanel::bottom("gallery_panel")
            .resizable(true)
            .min_height(120.0)
            .max_height(360.0)
            .default_height(180.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("🖼 Results");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("{} generated", ui_ctx.results.len()))
                                .color(Color32::GRAY),
                        );
                    });
                });
                ui.separator();

                let scroll = egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .stick_to_bottom(self.stick_to_bottom);
                scroll.show(ui, |ui| {
                    for card in &ui_ctx.results {
                        self.show_card(ui, ui_ctx, card);
                    }
                });
                self.stick_to_bottom = true;
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates() {
        assert_eq!(short_id("abcdef1234567890"), "abcdef12");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn short_id_respects_char_boundaries() {
        assert_eq!(short_id("日本語のモデル識別子です"), "日本語のモデル識");
        assert_eq!(short_id("ünïcødé"), "ünïcødé");
    }

    #[test]
    fn extension_label_uppercases() {
        assert_eq!(extension_label("model.obj"), "OBJ");
        assert_eq!(extension_label("noext"), "FILE");
    }
}
