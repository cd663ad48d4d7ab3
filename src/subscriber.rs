//! Topic subscriber: one text stream handler per topic, feeding decoded
//! payloads to the UI.
//!
//! Handlers never fail outward. An empty stream or an unparseable payload is
//! logged and dropped; every other payload becomes one
//! [`SubscriberEvent::MessageReceived`] in the order its read completed.

use std::collections::HashSet;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::common::{PayloadError, ReceivedMessage, SubscriberEvent};
use crate::room::{ParticipantInfo, Room, TextStreamHandler, TextStreamReader};

pub struct TopicSubscriber {
    topics: Vec<String>,
    registered: HashSet<String>,
    event_sender: mpsc::Sender<SubscriberEvent>,
}

impl TopicSubscriber {
    pub fn new(topics: Vec<String>, event_sender: mpsc::Sender<SubscriberEvent>) -> Self {
        Self {
            topics,
            registered: HashSet::new(),
            event_sender,
        }
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn is_registered(&self, topic: &str) -> bool {
        self.registered.contains(topic)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    /// Registers a handler for every topic not registered yet.
    ///
    /// Returns how many handlers were newly registered. A topic the room
    /// refuses is logged and skipped; the remaining topics still register.
    pub fn activate(&mut self, room: &dyn Room) -> usize {
        let mut added = 0;
        for topic in &self.topics {
            if self.registered.contains(topic) {
                continue;
            }

            let handler = topic_handler(topic.clone(), self.event_sender.clone());
            match room.register_text_stream_handler(topic, handler) {
                Ok(()) => {
                    self.registered.insert(topic.clone());
                    added += 1;
                    log::info!("Registered handler for topic: {topic}");
                }
                Err(err) => {
                    log::error!("Error registering handler for {topic}: {err}");
                }
            }
        }
        added
    }

    pub fn deactivate(&mut self, room: &dyn Room) {
        log::info!("Cleaning up text stream handlers");
        for topic in self.registered.drain() {
            room.unregister_text_stream_handler(&topic);
        }
    }
}

/// Builds the handler the room calls for each stream on `topic`.
pub fn topic_handler(
    topic: String,
    event_sender: mpsc::Sender<SubscriberEvent>,
) -> TextStreamHandler {
    Arc::new(move |reader: TextStreamReader, participant: ParticipantInfo| {
        let topic = topic.clone();
        let event_sender = event_sender.clone();
        async move {
            handle_text_stream(&topic, reader, participant, &event_sender).await;
        }
        .boxed()
    })
}

/// Reads one stream to the end and forwards the decoded message.
///
/// Returns whether a message was forwarded.
pub async fn handle_text_stream(
    topic: &str,
    reader: TextStreamReader,
    participant: ParticipantInfo,
    event_sender: &mpsc::Sender<SubscriberEvent>,
) -> bool {
    log::info!("[{topic}] Received data from: {}", participant.identity);
    log::debug!("[{topic}] Reading stream {}", reader.info().id);

    let text = reader.read_all().await;
    let message = match decode_payload(topic, &participant.identity, &text) {
        Ok(message) => message,
        Err(PayloadError::Empty) => {
            log::warn!("[{topic}] Received empty data");
            return false;
        }
        Err(err) => {
            log::error!("[{topic}] Error processing data: {err}");
            return false;
        }
    };
    log::debug!("[{topic}] Parsed data: {:?}", message.payload);

    if let Err(err) = event_sender
        .send(SubscriberEvent::MessageReceived(message))
        .await
    {
        log::warn!("[{topic}] UI is gone, dropping message: {err}");
        return false;
    }
    true
}

/// Decodes a complete stream payload into a message tagged with `topic`.
pub fn decode_payload(
    topic: &str,
    sender: &str,
    text: &str,
) -> Result<ReceivedMessage, PayloadError> {
    if text.trim().is_empty() {
        return Err(PayloadError::Empty);
    }

    match serde_json::from_str::<Value>(text)? {
        Value::Object(payload) => Ok(ReceivedMessage::new(topic, sender, payload)),
        _ => Err(PayloadError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::common::RoomError;
    use crate::common::topics::default_topics;
    use crate::room::LocalRoom;
    use crate::ui::palette::{PINK, topic_style};

    const WAIT: Duration = Duration::from_secs(2);

    fn subscriber(topics: Vec<String>) -> (TopicSubscriber, mpsc::Receiver<SubscriberEvent>) {
        let (event_tx, event_rx) = mpsc::channel(100);
        (TopicSubscriber::new(topics, event_tx), event_rx)
    }

    async fn next_message(events: &mut mpsc::Receiver<SubscriberEvent>) -> ReceivedMessage {
        match timeout(WAIT, events.recv()).await {
            Ok(Some(SubscriberEvent::MessageReceived(message))) => message,
            other => panic!("expected a message, got {other:?}"),
        }
    }

    async fn assert_no_message(events: &mut mpsc::Receiver<SubscriberEvent>) {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn decode_rejects_blank_text() {
        assert!(matches!(decode_payload("t", "p", ""), Err(PayloadError::Empty)));
        assert!(matches!(decode_payload("t", "p", " \n\t"), Err(PayloadError::Empty)));
    }

    #[test]
    fn decode_rejects_malformed_json() {
        assert!(matches!(
            decode_payload("t", "p", "{not valid json"),
            Err(PayloadError::MalformedJson(_))
        ));
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert!(matches!(
            decode_payload("t", "p", "[1, 2]"),
            Err(PayloadError::NotAnObject)
        ));
    }

    #[test]
    fn decode_tags_topic_and_sender() {
        let message = decode_payload("interview-metrics", "agent-1", r#"{"total_length": 12}"#)
            .expect("valid payload");
        assert_eq!(message.topic, "interview-metrics");
        assert_eq!(message.sender, "agent-1");
        assert_eq!(message.total_length().as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn feedback_payload_becomes_one_message() {
        let room = LocalRoom::new();
        let (mut subscriber, mut events) = subscriber(default_topics());
        assert_eq!(subscriber.activate(&room), 6);

        assert!(room.send_text(
            "interview-feedback",
            "agent",
            r#"{"content":"hello","timestamp":"2024-01-01T00:00:00Z"}"#,
        ));

        let message = next_message(&mut events).await;
        assert_eq!(message.topic, "interview-feedback");
        assert_eq!(message.content_text(), Some("hello"));
        assert_eq!(topic_style(&message.topic), PINK);
        assert_no_message(&mut events).await;
    }

    #[tokio::test]
    async fn empty_and_malformed_payloads_add_nothing() {
        let room = LocalRoom::new();
        let (mut subscriber, mut events) = subscriber(default_topics());
        subscriber.activate(&room);

        room.send_text("transcription", "agent", "");
        room.send_text("transcription", "agent", "   ");
        room.send_text("llm-transcription", "agent", "{not valid json");
        assert_no_message(&mut events).await;

        // the topic keeps working after a bad payload
        room.send_text("llm-transcription", "agent", r#"{"content":"ok"}"#);
        let recovered = next_message(&mut events).await;
        assert_eq!(recovered.content_text(), Some("ok"));
    }

    #[tokio::test]
    async fn sequential_payloads_keep_arrival_order() {
        let room = LocalRoom::new();
        let (mut subscriber, mut events) = subscriber(vec!["a".into(), "b".into()]);
        subscriber.activate(&room);

        room.send_text("a", "agent", r#"{"n":1}"#);
        let first = next_message(&mut events).await;
        room.send_text("b", "agent", r#"{"n":2}"#);
        let second = next_message(&mut events).await;

        assert_eq!(first.topic, "a");
        assert_eq!(second.topic, "b");
    }

    #[tokio::test]
    async fn stalled_stream_does_not_block_other_topics() {
        let room = LocalRoom::new();
        let (mut subscriber, mut events) = subscriber(vec!["slow".into(), "fast".into()]);
        subscriber.activate(&room);

        let slow = room.open_text_stream("slow", "agent");
        slow.write(r#"{"content":"#);
        room.send_text("fast", "agent", r#"{"content":"first"}"#);
        assert_eq!(next_message(&mut events).await.topic, "fast");

        slow.write(r#""late"}"#);
        slow.close();
        let late = next_message(&mut events).await;
        assert_eq!(late.topic, "slow");
        assert_eq!(late.content_text(), Some("late"));
    }

    #[tokio::test]
    async fn activation_is_idempotent() {
        let room = LocalRoom::new();
        let (mut subscriber, _events) = subscriber(vec!["a".into(), "b".into(), "a".into()]);

        assert_eq!(subscriber.activate(&room), 2);
        assert_eq!(subscriber.activate(&room), 0);
        assert_eq!(subscriber.registered_count(), 2);
    }

    #[tokio::test]
    async fn refused_topic_does_not_stop_the_others() {
        let room = LocalRoom::new();
        let (other_tx, _other_rx) = mpsc::channel(1);
        room.register_text_stream_handler("a", topic_handler("a".into(), other_tx))
            .expect("first registration");

        let topics = vec!["a".into(), "b".into(), "bad topic".into()];
        let (mut subscriber, _events) = subscriber(topics);
        assert_eq!(subscriber.activate(&room), 1);
        assert!(!subscriber.is_registered("a"));
        assert!(subscriber.is_registered("b"));
        assert!(!subscriber.is_registered("bad topic"));

        let err = room
            .register_text_stream_handler("b", topic_handler("b".into(), mpsc::channel(1).0))
            .unwrap_err();
        assert!(matches!(err, RoomError::AlreadyRegistered(_)));
    }

    #[tokio::test]
    async fn deactivate_clears_registrations() {
        let room = LocalRoom::new();
        let (mut subscriber, mut events) = subscriber(vec!["a".into()]);
        subscriber.activate(&room);
        assert!(room.has_handler("a"));

        subscriber.deactivate(&room);
        assert_eq!(subscriber.registered_count(), 0);
        assert!(!room.has_handler("a"));
        assert!(!room.send_text("a", "agent", r#"{"n":1}"#));

        assert_eq!(subscriber.activate(&room), 1);
        room.send_text("a", "agent", r#"{"n":2}"#);
        assert_eq!(next_message(&mut events).await.payload["n"], 2);
    }
}
