mod common;
mod config;
mod demo;
mod network;
mod room;
mod subscriber;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use config::{AppConfig, PanelLayout};
use dotenvy::dotenv;
use libp2p::multiaddr::Protocol;
use libp2p::{Multiaddr, PeerId};
use network::GossipRoom;
use room::{LocalRoom, Room};
use subscriber::TopicSubscriber;
use tokio::sync::mpsc;
use ui::StreamViewerApp;

#[derive(Parser)]
#[command(
    name = "topic_stream_viewer",
    version,
    about = "Live viewer for JSON text streams published on room topics"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Panel layout, overriding the config file
    #[arg(long, value_enum)]
    layout: Option<PanelLayout>,
    /// Topic to listen on (repeatable), overriding the configured list
    #[arg(long = "topic", value_name = "TOPIC")]
    topics: Vec<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
enum Mode {
    /// Run the viewer on a local room fed with sample payloads
    Demo,
    /// Publish one JSON payload on a gossip topic and exit (no UI)
    Publish {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        payload: String,
        /// Seconds to wait for peers before publishing
        #[arg(long, default_value_t = 3)]
        wait_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if let Some(layout) = cli.layout {
        app_config.layout = layout;
    }
    if !cli.topics.is_empty() {
        match app_config.layout {
            PanelLayout::Full => app_config.topics = cli.topics.clone(),
            PanelLayout::Simple => app_config.simple_topic = cli.topics[0].clone(),
        }
    }
    let bootstrap_peers = parse_bootstrap_peers(&app_config.bootstrap_nodes);

    match cli.mode {
        Some(Mode::Publish {
            topic,
            payload,
            wait_secs,
        }) => {
            run_publisher(&app_config, bootstrap_peers, &topic, &payload, wait_secs).await;
            Ok(())
        }
        Some(Mode::Demo) => {
            let room = LocalRoom::new();
            tokio::spawn(demo::run_feed(room.clone(), app_config.subscribed_topics()));
            run_viewer(app_config, Arc::new(room))
        }
        None => {
            let (room, client) = GossipRoom::new(bootstrap_peers, app_config.listen_addr.clone());
            tokio::spawn(async move {
                if let Err(err) = client.run().await {
                    log::error!("Room network loop terminated: {err}");
                }
            });
            run_viewer(app_config, Arc::new(room))
        }
    }
}

fn run_viewer(app_config: AppConfig, room: Arc<dyn Room>) -> Result<(), eframe::Error> {
    // Topic handlers -> UI
    let (event_tx, event_rx) = mpsc::channel(100);
    let topics = app_config.subscribed_topics();
    let layout = app_config.layout;
    let options = eframe::NativeOptions::default();

    log::info!("Viewer starting with {} topics ({layout:?} layout)", topics.len());

    eframe::run_native(
        &app_config.window_title,
        options,
        Box::new(move |cc| {
            let subscriber = TopicSubscriber::new(topics, event_tx);
            Ok(Box::new(StreamViewerApp::new(cc, layout, room, subscriber, event_rx)))
        }),
    )
}

async fn run_publisher(
    app_config: &AppConfig,
    bootstrap_peers: Vec<(PeerId, Multiaddr)>,
    topic: &str,
    payload: &str,
    wait_secs: u64,
) {
    let (room, client) = GossipRoom::new(bootstrap_peers, app_config.listen_addr.clone());
    tokio::spawn(async move {
        if let Err(err) = client.run().await {
            log::error!("Publisher network loop terminated: {err}");
        }
    });

    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
    match room.publish_text(topic, payload).await {
        Ok(()) => log::info!("Published {} bytes on {topic}", payload.len()),
        Err(err) => log::error!("Failed to publish on {topic}: {err}"),
    }

    // let gossipsub flush before the runtime shuts down
    tokio::time::sleep(Duration::from_millis(500)).await;
}

fn parse_bootstrap_peers(entries: &[String]) -> Vec<(PeerId, Multiaddr)> {
    entries
        .iter()
        .filter_map(|entry| {
            let mut addr: Multiaddr = match entry.parse() {
                Ok(addr) => addr,
                Err(err) => {
                    log::warn!("Invalid multiaddr `{entry}`: {err}");
                    return None;
                }
            };

            let peer_id = match addr.pop() {
                Some(Protocol::P2p(peer)) => peer,
                _ => {
                    log::warn!("Multiaddr `{entry}` missing /p2p/PeerId suffix");
                    return None;
                }
            };

            Some((peer_id, addr))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_entries_need_peer_suffix() {
        let peer = PeerId::random();
        let peers = parse_bootstrap_peers(&[
            "/ip4/127.0.0.1/tcp/4001".to_string(),
            "not an address".to_string(),
            format!("/ip4/127.0.0.1/tcp/4001/p2p/{peer}"),
        ]);
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].0, peer);
        assert_eq!(peers[0].1.to_string(), "/ip4/127.0.0.1/tcp/4001");
    }

    #[test]
    fn cli_parses_publish_mode() {
        let cli = Cli::parse_from([
            "topic_stream_viewer",
            "--topic",
            "a",
            "--topic",
            "b",
            "publish",
            "--topic",
            "interview-feedback",
            "--payload",
            "{}",
        ]);
        assert_eq!(cli.topics, vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(
            cli.mode,
            Some(Mode::Publish { ref topic, wait_secs: 3, .. }) if topic == "interview-feedback"
        ));
    }
}
