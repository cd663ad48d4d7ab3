//! The room boundary: topic-keyed text stream delivery.
//!
//! A room hands every inbound text stream to the handler registered for its
//! topic. Handlers receive a [`TextStreamReader`] and the sender's
//! [`ParticipantInfo`] and run as independent tasks, so streams on different
//! topics (or several on the same topic) may interleave freely.

pub mod local;
pub mod reader;
pub mod registry;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::common::RoomError;

pub use local::LocalRoom;
pub use reader::{ParticipantInfo, TextStreamReader, TextStreamWriter};
pub use registry::HandlerRegistry;

/// Callback invoked once per inbound text stream.
pub type TextStreamHandler =
    Arc<dyn Fn(TextStreamReader, ParticipantInfo) -> BoxFuture<'static, ()> + Send + Sync>;

pub trait Room: Send + Sync {
    /// Registers the handler for `topic`. A topic holds at most one handler.
    fn register_text_stream_handler(
        &self,
        topic: &str,
        handler: TextStreamHandler,
    ) -> Result<(), RoomError>;

    fn unregister_text_stream_handler(&self, topic: &str);
}
