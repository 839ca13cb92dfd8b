use egui::{Color32, Context, RichText};

use crate::form::Mode;
use crate::ui::{UiComponent, UiContext, UiEvent};

#[derive(Default)]
pub struct TopPanel {}

impl UiComponent for TopPanel {
    fn show(&mut self, ctx: &Context, ui_ctx: &mut UiContext) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🎨 artifex");
                ui.separator();

                for mode in [Mode::Image, Mode::Model] {
                    let selected = ui_ctx.mode == mode;
                    if ui.selectable_label(selected, mode.title()).clicked() && !selected {
                        ui_ctx.send_event(UiEvent::ModeChanged(mode));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui_ctx.form.busy {
                        ui.spinner();
                    }
                    ui.label(RichText::new(&ui_ctx.status).color(Color32::LIGHT_BLUE));
                });
            });
        });
    }
}
