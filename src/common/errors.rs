/// Why a single inbound payload was dropped.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("received empty data")]
    Empty,
    #[error("invalid JSON received: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("payload is JSON but not an object")]
    NotAnObject,
}

/// Failures reported by a room when (un)registering text stream handlers.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("a text stream handler for topic `{0}` is already registered")]
    AlreadyRegistered(String),
    #[error("invalid topic name `{0}`")]
    InvalidTopic(String),
    #[error("room command queue is full")]
    QueueFull,
    #[error("room is closed")]
    Closed,
}
