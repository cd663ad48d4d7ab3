use eframe::egui::{self, RichText};

use crate::common::ReceivedMessage;

/// Minimal layout: every payload pretty-printed, no filtering or styling.
pub fn render(ctx: &egui::Context, messages: &[ReceivedMessage]) {
    egui::Window::new("Structured Data:")
        .id(egui::Id::new("simple_printer"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
        .default_width(384.0)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("simple_printer_items")
                .max_height(384.0)
                .show(ui, |ui| {
                    for message in messages {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.label(RichText::new(message.payload_pretty()).monospace().small());
                        });
                    }
                });
        });
}
