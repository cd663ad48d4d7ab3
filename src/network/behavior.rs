use std::error::Error;
use std::time::Duration;

use libp2p::gossipsub;
use libp2p::mdns;
use libp2p::swarm::NetworkBehaviour;
use libp2p::{PeerId, identity};

/// Upper bound for one text stream payload on the wire.
const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

#[derive(NetworkBehaviour)]
pub struct RoomBehavior {
    pub gossipsub: gossipsub::Behaviour,
    pub mdns: mdns::tokio::Behaviour,
}

/// Gossipsub with no topics joined yet; topics follow handler registration.
///
/// Message ids keep the default source + sequence number scheme, so two
/// identical payloads are still two distinct messages.
pub fn build_behavior(
    local_key: &identity::Keypair,
    local_peer_id: PeerId,
) -> Result<RoomBehavior, Box<dyn Error>> {
    let gossipsub_config = gossipsub::ConfigBuilder::default()
        .heartbeat_interval(Duration::from_secs(10))
        .validation_mode(gossipsub::ValidationMode::Strict)
        .max_transmit_size(MAX_PAYLOAD_BYTES)
        .build()?;

    let gossipsub = gossipsub::Behaviour::new(
        gossipsub::MessageAuthenticity::Signed(local_key.clone()),
        gossipsub_config,
    )?;

    let mdns = mdns::tokio::Behaviour::new(mdns::Config::default(), local_peer_id)?;

    Ok(RoomBehavior { gossipsub, mdns })
}
