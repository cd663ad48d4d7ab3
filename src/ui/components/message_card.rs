use eframe::egui::{self, RichText};

use crate::common::ReceivedMessage;
use crate::common::topics::topic_label;
use crate::ui::palette::topic_style;

const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(156, 163, 175);
const VOICE_COLOR: egui::Color32 = egui::Color32::from_rgb(74, 222, 128);
const RAW_VIEW_HEIGHT: f32 = 192.0;

/// Renders one message card. `ordinal` is its 1-based position in the list.
pub fn render(ui: &mut egui::Ui, message: &ReceivedMessage, ordinal: usize) {
    let style = topic_style(&message.topic);

    egui::Frame::group(ui.style())
        .fill(egui::Color32::from_rgb(31, 41, 55))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(55, 65, 81)))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("Response #{ordinal}"))
                        .strong()
                        .color(style.text),
                )
                .on_hover_text(provenance(message));
                ui.label(
                    RichText::new(format!(" {} ", topic_label(&message.topic)))
                        .small()
                        .color(style.text)
                        .background_color(style.fill),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(message.display_time()).small().weak());
                });
            });

            let kind = message.kind();
            let source = message.source();
            if kind.is_some() || source.is_some() {
                ui.horizontal(|ui| {
                    if let Some(kind) = kind {
                        ui.label(RichText::new("Type:").small().color(LABEL_COLOR));
                        ui.label(RichText::new(kind).small());
                    }
                    if let Some(source) = source {
                        ui.label(RichText::new("Source:").small().color(LABEL_COLOR));
                        ui.label(RichText::new(source).small());
                    }
                });
            }

            if let Some(content) = message.content_text() {
                text_block(ui, "Content:", RichText::new(content));
            }

            if let Some(response) = message.system_response() {
                text_block(ui, "System Response:", RichText::new(response));
            }

            if let Some(instructions) = message.voice_instructions() {
                text_block(
                    ui,
                    "Voice Instructions:",
                    RichText::new(instructions).color(VOICE_COLOR),
                );
            }

            let chunks = message.chunk_count();
            let length = message.total_length();
            if chunks.is_some() || length.is_some() {
                ui.horizontal(|ui| {
                    if let Some(chunks) = chunks {
                        ui.label(RichText::new(format!("Chunks: {chunks}")).small().weak());
                    }
                    if let Some(length) = length {
                        ui.label(RichText::new(format!("Length: {length}")).small().weak());
                    }
                });
            }

            egui::CollapsingHeader::new(RichText::new("View full JSON").small().color(LABEL_COLOR))
                .id_salt(message.id)
                .default_open(false)
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt(("raw_json", message.id))
                        .max_height(RAW_VIEW_HEIGHT)
                        .show(ui, |ui| {
                            ui.label(RichText::new(message.raw_pretty()).monospace().small());
                        });
                });
        });
}

fn provenance(message: &ReceivedMessage) -> String {
    let mut lines = vec![format!("From: {}", message.sender)];
    if let Some(user) = message.user_id() {
        lines.push(format!("User: {user}"));
    }
    if let Some(session) = message.session_id() {
        lines.push(format!("Session: {session}"));
    }
    lines.join("\n")
}

fn text_block(ui: &mut egui::Ui, title: &str, body: RichText) {
    ui.label(RichText::new(title).small().color(LABEL_COLOR));
    ui.label(body);
    ui.add_space(4.0);
}
