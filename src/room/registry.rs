use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::common::RoomError;

use super::{ParticipantInfo, TextStreamHandler, TextStreamReader};

/// Topic -> handler table shared by the room implementations.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Mutex<HashMap<String, TextStreamHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, topic: &str, handler: TextStreamHandler) -> Result<(), RoomError> {
        if topic.trim().is_empty() || topic.chars().any(char::is_whitespace) {
            return Err(RoomError::InvalidTopic(topic.to_string()));
        }

        let mut handlers = self.lock();
        if handlers.contains_key(topic) {
            return Err(RoomError::AlreadyRegistered(topic.to_string()));
        }
        handlers.insert(topic.to_string(), handler);
        Ok(())
    }

    pub fn unregister(&self, topic: &str) -> bool {
        self.lock().remove(topic).is_some()
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.lock().contains_key(topic)
    }

    /// Spawns the handler for the reader's topic on the tokio runtime.
    ///
    /// Returns `false` when nobody listens on that topic; the stream is dropped.
    pub fn dispatch(&self, reader: TextStreamReader, participant: ParticipantInfo) -> bool {
        let topic = reader.info().topic.clone();
        let Some(handler) = self.lock().get(&topic).cloned() else {
            log::debug!("No text stream handler for topic `{topic}`; dropping stream");
            return false;
        };

        tokio::spawn(handler(reader, participant));
        true
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, TextStreamHandler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
