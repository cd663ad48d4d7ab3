use eframe::egui::{self, RichText};

use crate::ui::state::{EmptyState, PanelState};

use super::{message_card, toggle_button, topic_filter};

const PANEL_WIDTH: f32 = 384.0;
const LIST_HEIGHT: f32 = 520.0;

/// Full data panel, or its toggle button while hidden.
pub fn render(ctx: &egui::Context, state: &mut PanelState) {
    if !state.is_visible() {
        toggle_button::render(ctx, state);
        return;
    }

    egui::Window::new("Structured Data Stream")
        .id(egui::Id::new("data_panel"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-32.0, 32.0))
        .title_bar(false)
        .resizable(false)
        .default_width(PANEL_WIDTH)
        .show(ctx, |ui| {
            ui.set_width(PANEL_WIDTH);
            header(ui, state);
            ui.separator();

            if state.shows_filter_bar() {
                topic_filter::render(ui, state);
                ui.separator();
            }

            let shown = message_list(ui, state);

            if let Some(text) = state.footer_text(shown) {
                ui.separator();
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(text).weak());
                });
            }
        });
}

fn header(ui: &mut egui::Ui, state: &mut PanelState) {
    ui.horizontal(|ui| {
        ui.heading("Structured Data Stream");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("×").on_hover_text("Close panel").clicked() {
                state.hide();
            }
            if ui.button("Clear").on_hover_text("Clear all responses").clicked() {
                state.clear_messages();
            }
        });
    });
}

/// Renders the filtered list and returns how many messages it shows.
fn message_list(ui: &mut egui::Ui, state: &mut PanelState) -> usize {
    let scroll_to_bottom = state.take_scroll_request();
    let numbered = state.numbered_messages();

    egui::ScrollArea::vertical()
        .id_salt("data_panel_messages")
        .max_height(LIST_HEIGHT)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            if numbered.is_empty() {
                empty_state(ui, &state.empty_state());
            } else {
                for (ordinal, message) in &numbered {
                    message_card::render(ui, message, *ordinal);
                    ui.add_space(6.0);
                }
            }

            if scroll_to_bottom {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });

    numbered.len()
}

fn empty_state(ui: &mut egui::Ui, empty: &EmptyState) {
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        match empty {
            EmptyState::Waiting { listening_on } => {
                ui.label(RichText::new("🎤").size(32.0));
                ui.label(empty.headline());
                ui.label(
                    RichText::new(format!("Listening on {listening_on} topics"))
                        .small()
                        .weak(),
                );
            }
            EmptyState::NoMatches { .. } => {
                ui.label(RichText::new("🔍").size(32.0));
                ui.label(empty.headline());
            }
        }
        ui.add_space(24.0);
    });
}
