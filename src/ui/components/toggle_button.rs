use eframe::egui::{self, RichText};

use crate::ui::state::PanelState;

const BADGE_COLOR: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

/// Floating button that reopens the hidden data panel.
pub fn render(ctx: &egui::Context, state: &mut PanelState) {
    egui::Area::new(egui::Id::new("data_panel_toggle"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-32.0, 32.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let open = ui
                    .button(RichText::new("📋").size(20.0))
                    .on_hover_text("Show structured data panel");
                if open.clicked() {
                    state.show();
                }

                if let Some(count) = state.badge_count() {
                    ui.label(
                        RichText::new(format!(" {count} "))
                            .small()
                            .color(egui::Color32::WHITE)
                            .background_color(BADGE_COLOR),
                    );
                }
            });
        });
}
