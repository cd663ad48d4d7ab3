use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Key under which the arrival topic is shown in the raw JSON view.
pub const TOPIC_FIELD: &str = "_topic";

const UNKNOWN_TIME: &str = "--:--:--";

/// Date-times without an offset, read as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One decoded payload received on a text stream topic.
///
/// The payload keeps every field it arrived with. Known fields are only read
/// through the accessors below, which check for presence and never coerce.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedMessage {
    pub id: Uuid,
    pub topic: String,
    pub sender: String,
    pub payload: Map<String, Value>,
    content: Option<String>,
}

impl ReceivedMessage {
    pub fn new(
        topic: impl Into<String>,
        sender: impl Into<String>,
        payload: Map<String, Value>,
    ) -> Self {
        let content = payload.get("content").and_then(render_content);
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            sender: sender.into(),
            payload,
            content,
        }
    }

    pub fn kind(&self) -> Option<String> {
        self.display_field("type")
    }

    pub fn source(&self) -> Option<String> {
        self.display_field("source")
    }

    pub fn system_response(&self) -> Option<String> {
        self.display_field("system_response")
    }

    pub fn voice_instructions(&self) -> Option<String> {
        self.display_field("voice_instructions")
    }

    pub fn chunk_count(&self) -> Option<String> {
        self.display_field("chunk_count")
    }

    pub fn total_length(&self) -> Option<String> {
        self.display_field("total_length")
    }

    pub fn session_id(&self) -> Option<String> {
        self.display_field("session_id")
    }

    pub fn user_id(&self) -> Option<String> {
        self.display_field("user_id")
    }

    /// Content block text: strings verbatim, anything else pretty-printed.
    ///
    /// Rendered once when the message is built.
    pub fn content_text(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Local wall-clock time of the `timestamp` field.
    ///
    /// Accepts RFC 3339 strings, ISO date-times without an offset (taken as
    /// UTC) and epoch milliseconds; anything else renders as a placeholder.
    pub fn display_time(&self) -> String {
        let parsed = match self.payload.get("timestamp") {
            Some(Value::String(text)) => parse_time_text(text),
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|millis| millis.trunc() as i64))
                .and_then(|millis| Local.timestamp_millis_opt(millis).single()),
            _ => None,
        };

        parsed
            .map(|time| time.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| UNKNOWN_TIME.to_string())
    }

    /// The whole message as JSON: the payload plus its `_topic` tag.
    pub fn to_raw_json(&self) -> Value {
        let mut raw = self.payload.clone();
        raw.insert(TOPIC_FIELD.to_string(), Value::String(self.topic.clone()));
        Value::Object(raw)
    }

    pub fn raw_pretty(&self) -> String {
        pretty(&self.to_raw_json())
    }

    /// The payload alone, exactly as received.
    pub fn payload_pretty(&self) -> String {
        pretty(&Value::Object(self.payload.clone()))
    }

    /// A field rendered as display text, or `None` when it is absent or blank.
    fn display_field(&self, key: &str) -> Option<String> {
        match self.payload.get(key)? {
            value if is_blank(value) => None,
            Value::String(text) => Some(text.clone()),
            value => Some(value.to_string()),
        }
    }
}

fn parse_time_text(text: &str) -> Option<DateTime<Local>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&Local));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

fn render_content(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        value if is_blank(value) => None,
        value => Some(pretty(value)),
    }
}

/// Null, `false`, zero and the empty string count as "not present".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
