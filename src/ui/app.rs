use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::SubscriberEvent;
use crate::config::PanelLayout;
use crate::room::Room;
use crate::subscriber::TopicSubscriber;

use super::components::{data_panel, simple_printer};
use super::state::PanelState;

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct StreamViewerApp {
    layout: PanelLayout,
    state: PanelState,
    room: Arc<dyn Room>,
    subscriber: TopicSubscriber,
    event_receiver: mpsc::Receiver<SubscriberEvent>,
}

impl StreamViewerApp {
    /// Registers the subscriber's topics on `room` right away.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        layout: PanelLayout,
        room: Arc<dyn Room>,
        mut subscriber: TopicSubscriber,
        event_receiver: mpsc::Receiver<SubscriberEvent>,
    ) -> Self {
        subscriber.activate(room.as_ref());
        Self {
            layout,
            state: PanelState::new(subscriber.topics().len()),
            room,
            subscriber,
            event_receiver,
        }
    }

    fn handle_subscriber_events(&mut self) -> bool {
        let mut received = false;
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                SubscriberEvent::MessageReceived(message) => self.state.push_message(message),
            }
            received = true;
        }
        received
    }
}

impl eframe::App for StreamViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.handle_subscriber_events() {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Topic Stream Viewer");
            ui.separator();
            ui.label(format!(
                "Registered {} of {} topics",
                self.subscriber.registered_count(),
                self.subscriber.topics().len()
            ));
            for topic in self.subscriber.topics() {
                let marker = if self.subscriber.is_registered(topic) { "●" } else { "○" };
                ui.label(egui::RichText::new(format!("{marker} {topic}")).weak());
            }

            if let Some(latest) = self.state.latest_message() {
                ui.separator();
                ui.label(format!(
                    "Latest: {} from {} at {}",
                    latest.topic,
                    latest.sender,
                    latest.display_time()
                ));
            }
        });

        match self.layout {
            PanelLayout::Full => data_panel::render(ctx, &mut self.state),
            PanelLayout::Simple => simple_printer::render(ctx, &self.state.messages),
        }

        // handlers deliver from other threads; poll for them
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

impl Drop for StreamViewerApp {
    fn drop(&mut self) {
        self.subscriber.deactivate(self.room.as_ref());
    }
}
