//! Sample feed for the `demo` mode: a local room that produces payloads
//! like the ones an interview voice agent publishes.

use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};

use crate::room::LocalRoom;

const FEED_INTERVAL: Duration = Duration::from_millis(1500);
const DEMO_IDENTITY: &str = "demo-agent";
/// Valid samples are written in pieces of this many bytes or fewer.
const CHUNK_SIZE: usize = 64;

/// Publishes one sample on each tick, cycling through `topics`.
///
/// Every seventh tick sends an empty stream and every eleventh a malformed
/// one, so the drop paths show up in the logs. Valid samples are streamed in
/// chunks, the way a voice agent writes them.
pub async fn run_feed(room: LocalRoom, topics: Vec<String>) {
    if topics.is_empty() {
        log::warn!("Demo feed has no topics to publish on");
        return;
    }

    let mut interval = tokio::time::interval(FEED_INTERVAL);
    let mut tick: usize = 0;
    loop {
        interval.tick().await;
        tick += 1;
        let topic = &topics[tick % topics.len()];

        if !room.has_handler(topic) {
            log::debug!("Demo feed: nobody listens on {topic} yet");
            continue;
        }

        if tick % 7 == 0 {
            room.send_text(topic, DEMO_IDENTITY, "");
        } else if tick % 11 == 0 {
            room.send_text(topic, DEMO_IDENTITY, "{not valid json");
        } else {
            stream_text(&room, topic, &sample_payload(topic, tick).to_string());
        }
    }
}

/// Writes `text` to a new stream on `topic` in `CHUNK_SIZE` pieces.
fn stream_text(room: &LocalRoom, topic: &str, text: &str) {
    let writer = room.open_text_stream(topic, DEMO_IDENTITY);
    for chunk in chunks(text, CHUNK_SIZE) {
        if !writer.write(chunk) {
            log::debug!("Demo feed: reader on {topic} went away");
            return;
        }
    }
    writer.close();
}

/// Splits `text` into pieces of at most `size` bytes, on char boundaries.
fn chunks(text: &str, size: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = size.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (piece, tail) = rest.split_at(end);
        pieces.push(piece);
        rest = tail;
    }
    pieces
}

pub fn sample_payload(topic: &str, tick: usize) -> Value {
    let timestamp = Utc::now().to_rfc3339();
    let base = json!({
        "user_id": "demo-user",
        "session_id": "demo-session",
        "timestamp": timestamp,
    });

    let source = if topic == "transcription" { "user" } else { "llm" };
    let speaker = if tick % 2 == 0 { "agent" } else { "user" };
    let extra = match topic {
        "llm-structured-output" | "llm-structured-response" => json!({
            "type": "structured_response",
            "source": "llm",
            "is_structured": true,
            "content": { "question": format!("Question {tick}"), "difficulty": "medium" },
            "system_response": "Let's move on to the next question.",
            "voice_instructions": "Speak calmly and slowly.",
        }),
        "llm-transcription" | "transcription" => json!({
            "type": "transcription",
            "source": source,
            "content": format!("Transcribed sentence number {tick}."),
            "chunk_count": tick % 4 + 1,
            "total_length": 24 + tick,
        }),
        "interview-metrics" => json!({
            "type": "metrics",
            "content": { "words_per_minute": 120 + tick % 30, "filler_words": tick % 5 },
        }),
        "interview-feedback" => json!({
            "type": "feedback",
            "content": "Good structure, try to give a concrete example.",
        }),
        "interview-turn-data" => json!({
            "type": "turn",
            "content": { "turn": tick, "speaker": speaker },
        }),
        _ => json!({ "content": format!("Sample {tick} on {topic}") }),
    };

    merge(base, extra)
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Value::Object(base_map), Value::Object(extra_map)) = (&mut base, extra) {
        base_map.extend(extra_map);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use crate::common::SubscriberEvent;
    use crate::common::topics::KNOWN_TOPICS;
    use crate::subscriber::{TopicSubscriber, decode_payload};

    #[test]
    fn samples_decode_for_every_known_topic() {
        for topic in KNOWN_TOPICS {
            let text = sample_payload(topic, 3).to_string();
            let message = decode_payload(topic, DEMO_IDENTITY, &text).expect("sample decodes");
            assert!(message.content_text().is_some(), "{topic} has content");
            assert_eq!(message.session_id().as_deref(), Some("demo-session"));
        }
    }

    #[test]
    fn chunks_respect_char_boundaries() {
        assert!(chunks("", 4).is_empty());
        assert_eq!(chunks("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        let text = "héllo wörld";
        let pieces = chunks(text, 2);
        assert!(pieces.iter().all(|piece| !piece.is_empty()));
        assert_eq!(pieces.concat(), text);
    }

    #[tokio::test]
    async fn streamed_sample_reaches_the_subscriber_whole() {
        let room = LocalRoom::new();
        let (event_tx, mut events) = mpsc::channel(4);
        let mut subscriber = TopicSubscriber::new(vec!["interview-feedback".into()], event_tx);
        subscriber.activate(&room);

        let sample = sample_payload("interview-feedback", 2);
        let text = sample.to_string();
        assert!(text.len() > CHUNK_SIZE);
        stream_text(&room, "interview-feedback", &text);

        let received = timeout(Duration::from_secs(2), events.recv()).await;
        match received {
            Ok(Some(SubscriberEvent::MessageReceived(message))) => {
                assert_eq!(Value::Object(message.payload), sample);
            }
            other => panic!("expected the streamed sample, got {other:?}"),
        }
    }

    #[test]
    fn unknown_topic_still_gets_content() {
        let sample = sample_payload("custom", 1);
        assert_eq!(sample["content"], json!("Sample 1 on custom"));
    }
}
