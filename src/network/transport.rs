use std::error::Error;
use std::time::Duration;

use libp2p::core::muxing::StreamMuxerBox;
use libp2p::core::transport::Boxed;
use libp2p::core::upgrade::Version;
use libp2p::{PeerId, Transport, dns, identity, noise, tcp, yamux};

const UPGRADE_TIMEOUT: Duration = Duration::from_secs(20);

/// TCP with DNS resolution, so bootstrap entries may use `/dns4/...` names.
pub fn build_transport(
    local_key: &identity::Keypair,
) -> Result<Boxed<(PeerId, StreamMuxerBox)>, Box<dyn Error>> {
    let noise_config = noise::Config::new(local_key)?;
    let tcp_transport = tcp::tokio::Transport::new(tcp::Config::default().nodelay(true));

    let transport = dns::tokio::Transport::system(tcp_transport)?
        .upgrade(Version::V1)
        .authenticate(noise_config)
        .multiplex(yamux::Config::default())
        .timeout(UPGRADE_TIMEOUT)
        .boxed();

    Ok(transport)
}
