use eframe::egui::{self, RichText};

use crate::common::topics::topic_label;
use crate::ui::palette::topic_style;
use crate::ui::state::PanelState;

/// "All (N)" plus one toggle per topic seen so far.
///
/// Only worth showing once more than one topic has been seen.
pub fn render(ui: &mut egui::Ui, state: &mut PanelState) {
    let topics = state.distinct_topics();
    let total = state.messages.len();

    ui.horizontal_wrapped(|ui| {
        let all = egui::Button::new(RichText::new(format!("All ({total})")).small())
            .selected(state.filter_topic.is_none());
        if ui.add(all).clicked() {
            state.clear_filter();
        }

        for (topic, count) in &topics {
            let active = state.filter_topic.as_deref() == Some(topic.as_str());
            let label = format!("{} ({count})", topic_label(topic));
            let button = if active {
                let style = topic_style(topic);
                egui::Button::new(RichText::new(label).small().color(style.text))
                    .fill(style.fill)
                    .stroke(egui::Stroke::new(1.0, style.stroke))
            } else {
                egui::Button::new(RichText::new(label).small())
            };

            if ui.add(button).on_hover_text(topic.as_str()).clicked() {
                state.toggle_filter(topic);
            }
        }
    });
}
