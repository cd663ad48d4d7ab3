use std::error::Error;
use std::sync::Arc;

use libp2p::{Multiaddr, PeerId};
use tokio::sync::{mpsc, oneshot};
use tokio::sync::mpsc::error::TrySendError;

use crate::common::{RoomCommand, RoomError};
use crate::room::{HandlerRegistry, Room, TextStreamHandler};

use super::client::GossipClient;

const COMMAND_QUEUE: usize = 100;

/// Room backed by libp2p gossipsub: one gossip topic per text stream topic.
#[derive(Clone)]
pub struct GossipRoom {
    handlers: Arc<HandlerRegistry>,
    command_sender: mpsc::Sender<RoomCommand>,
}

impl GossipRoom {
    /// Creates the room handle and the network loop that must be spawned for it.
    pub fn new(
        bootstrap_peers: Vec<(PeerId, Multiaddr)>,
        listen_addr: String,
    ) -> (Self, GossipClient) {
        let (command_sender, command_receiver) = mpsc::channel(COMMAND_QUEUE);
        let handlers = Arc::new(HandlerRegistry::new());
        let client = GossipClient::new(
            command_receiver,
            handlers.clone(),
            bootstrap_peers,
            listen_addr,
        );
        (
            Self {
                handlers,
                command_sender,
            },
            client,
        )
    }

    /// Publishes `payload` as one text stream on `topic`.
    pub async fn publish_text(&self, topic: &str, payload: &str) -> Result<(), Box<dyn Error>> {
        let (reply, result) = oneshot::channel();
        self.command_sender
            .send(RoomCommand::Publish {
                topic: topic.to_string(),
                payload: payload.to_string(),
                reply,
            })
            .await
            .map_err(|_| RoomError::Closed)?;

        result.await.map_err(|_| RoomError::Closed)??;
        Ok(())
    }

    fn send_command(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.command_sender.try_send(command).map_err(|err| match err {
            TrySendError::Full(_) => RoomError::QueueFull,
            TrySendError::Closed(_) => RoomError::Closed,
        })
    }
}

impl Room for GossipRoom {
    fn register_text_stream_handler(
        &self,
        topic: &str,
        handler: TextStreamHandler,
    ) -> Result<(), RoomError> {
        self.handlers.register(topic, handler)?;
        if let Err(err) = self.send_command(RoomCommand::Subscribe(topic.to_string())) {
            self.handlers.unregister(topic);
            return Err(err);
        }
        Ok(())
    }

    fn unregister_text_stream_handler(&self, topic: &str) {
        if self.handlers.unregister(topic) {
            if let Err(err) = self.send_command(RoomCommand::Unsubscribe(topic.to_string())) {
                log::warn!("Failed to leave gossip topic {topic}: {err}");
            }
        }
    }
}
