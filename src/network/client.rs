use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use futures::StreamExt;
use libp2p::gossipsub::{self, IdentTopic, TopicHash};
use libp2p::swarm::{Config as SwarmConfig, SwarmEvent};
use libp2p::{Multiaddr, PeerId, Swarm, identity, mdns};
use tokio::sync::mpsc;

use crate::common::RoomCommand;
use crate::room::{HandlerRegistry, ParticipantInfo, TextStreamReader};

use super::behavior::{RoomBehavior, RoomBehaviorEvent, build_behavior};
use super::transport::build_transport;

/// Network loop behind a [`super::GossipRoom`].
///
/// Joins a gossip topic for each registered handler and turns every gossip
/// message on it into one text stream for that handler.
pub struct GossipClient {
    command_receiver: mpsc::Receiver<RoomCommand>,
    handlers: Arc<HandlerRegistry>,
    bootstrap_peers: Vec<(PeerId, Multiaddr)>,
    listen_addr: String,
    topics: HashMap<TopicHash, String>,
}

impl GossipClient {
    pub fn new(
        command_receiver: mpsc::Receiver<RoomCommand>,
        handlers: Arc<HandlerRegistry>,
        bootstrap_peers: Vec<(PeerId, Multiaddr)>,
        listen_addr: String,
    ) -> Self {
        Self {
            command_receiver,
            handlers,
            bootstrap_peers,
            listen_addr,
            topics: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(super) fn command_receiver_mut(&mut self) -> &mut mpsc::Receiver<RoomCommand> {
        &mut self.command_receiver
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        let local_key = identity::Keypair::generate_ed25519();
        let local_peer_id = PeerId::from(local_key.public());
        log::info!("Local PeerID: {local_peer_id:?}");

        let transport = build_transport(&local_key)?;
        let behavior = build_behavior(&local_key, local_peer_id)?;

        let mut swarm = Swarm::new(
            transport,
            behavior,
            local_peer_id,
            SwarmConfig::with_tokio_executor(),
        );

        swarm.listen_on(self.listen_addr.parse()?)?;

        for (peer_id, addr) in std::mem::take(&mut self.bootstrap_peers) {
            log::info!("Dialing bootstrap peer {peer_id} at {addr}");
            swarm.behaviour_mut().gossipsub.add_explicit_peer(&peer_id);
            if let Err(err) = swarm.dial(addr) {
                log::warn!("Failed to dial bootstrap peer {peer_id}: {err}");
            }
        }

        log::info!("Room event loop started");

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.handle_command(command, &mut swarm),
                        None => break,
                    }
                }
                event = swarm.select_next_some() => {
                    self.handle_swarm_event(event, &mut swarm);
                }
            }
        }

        log::info!("Room closed; network loop stopped");
        Ok(())
    }

    fn handle_command(&mut self, command: RoomCommand, swarm: &mut Swarm<RoomBehavior>) {
        match command {
            RoomCommand::Subscribe(name) => {
                let topic = IdentTopic::new(name.as_str());
                match swarm.behaviour_mut().gossipsub.subscribe(&topic) {
                    Ok(_) => {
                        log::debug!("Joined gossip topic {name}");
                        self.topics.insert(topic.hash(), name);
                    }
                    Err(err) => log::warn!("Failed to join gossip topic {name}: {err:?}"),
                }
            }
            RoomCommand::Unsubscribe(name) => {
                let topic = IdentTopic::new(name.as_str());
                swarm.behaviour_mut().gossipsub.unsubscribe(&topic);
                self.topics.remove(&topic.hash());
                log::debug!("Left gossip topic {name}");
            }
            RoomCommand::Publish {
                topic,
                payload,
                reply,
            } => {
                let result = swarm
                    .behaviour_mut()
                    .gossipsub
                    .publish(IdentTopic::new(topic.as_str()), payload.into_bytes())
                    .map(|_| ())
                    .map_err(|err| format!("{err:?}"));
                if reply.send(result).is_err() {
                    log::debug!("Publisher went away before the publish result");
                }
            }
        }
    }

    fn handle_swarm_event(
        &mut self,
        event: SwarmEvent<RoomBehaviorEvent>,
        swarm: &mut Swarm<RoomBehavior>,
    ) {
        match event {
            SwarmEvent::Behaviour(RoomBehaviorEvent::Gossipsub(gossipsub::Event::Message {
                propagation_source,
                message,
                ..
            })) => {
                let sender = message.source.unwrap_or(propagation_source);
                self.deliver(message.topic, message.data, sender);
            }
            SwarmEvent::Behaviour(RoomBehaviorEvent::Mdns(mdns::Event::Discovered(list))) => {
                for (peer_id, _) in list {
                    log::debug!("mDNS discovered {peer_id}");
                    swarm.behaviour_mut().gossipsub.add_explicit_peer(&peer_id);
                }
            }
            SwarmEvent::Behaviour(RoomBehaviorEvent::Mdns(mdns::Event::Expired(list))) => {
                for (peer_id, _) in list {
                    swarm
                        .behaviour_mut()
                        .gossipsub
                        .remove_explicit_peer(&peer_id);
                }
            }
            SwarmEvent::NewListenAddr { address, .. } => {
                log::info!("Listening on {address:?}");
            }
            SwarmEvent::ConnectionEstablished { peer_id, .. } => {
                log::info!("Connected to {peer_id}");
            }
            _ => {}
        }
    }

    fn deliver(&self, topic_hash: TopicHash, data: Vec<u8>, sender: PeerId) {
        let Some(topic) = self.topics.get(&topic_hash) else {
            log::debug!("Ignoring gossip on unjoined topic {topic_hash}");
            return;
        };

        let text = match String::from_utf8(data) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("[{topic}] Dropping non UTF-8 payload from {sender}: {err}");
                return;
            }
        };

        let reader = TextStreamReader::from_text(topic.as_str(), text);
        self.handlers
            .dispatch(reader, ParticipantInfo::new(sender.to_string()));
    }
}
