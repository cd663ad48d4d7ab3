use tokio::sync::oneshot;

/// Commands the gossip room sends down to its network loop.
#[derive(Debug)]
pub enum RoomCommand {
    Subscribe(String),
    Unsubscribe(String),
    /// Publish one text stream on a topic. Only used by the `publish` CLI mode.
    Publish {
        topic: String,
        payload: String,
        reply: oneshot::Sender<Result<(), String>>,
    },
}
