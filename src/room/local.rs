use std::sync::Arc;

use crate::common::RoomError;

use super::{
    HandlerRegistry, ParticipantInfo, Room, TextStreamHandler, TextStreamReader, TextStreamWriter,
};

/// In-process room: whatever is sent on it is delivered to its own handlers.
///
/// Used by the `demo` mode and by tests. Must be driven from inside a tokio
/// runtime since handlers are spawned as tasks.
#[derive(Clone, Default)]
pub struct LocalRoom {
    handlers: Arc<HandlerRegistry>,
}

impl LocalRoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a stream on `topic` and hands its reader to the topic handler.
    pub fn open_text_stream(&self, topic: &str, identity: &str) -> TextStreamWriter {
        let (writer, reader) = TextStreamReader::channel(topic);
        self.handlers.dispatch(reader, ParticipantInfo::new(identity));
        writer
    }

    /// Sends one complete text payload. Returns `false` if no handler listens.
    pub fn send_text(&self, topic: &str, identity: &str, text: &str) -> bool {
        let reader = TextStreamReader::from_text(topic, text);
        self.handlers.dispatch(reader, ParticipantInfo::new(identity))
    }

    pub fn has_handler(&self, topic: &str) -> bool {
        self.handlers.contains(topic)
    }
}

impl Room for LocalRoom {
    fn register_text_stream_handler(
        &self,
        topic: &str,
        handler: TextStreamHandler,
    ) -> Result<(), RoomError> {
        self.handlers.register(topic, handler)
    }

    fn unregister_text_stream_handler(&self, topic: &str) {
        self.handlers.unregister(topic);
    }
}
