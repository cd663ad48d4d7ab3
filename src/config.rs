use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::topics::{SIMPLE_TOPIC, default_topics};

pub const DEFAULT_CONFIG_PATH: &str = "config/viewer.json";

/// Which panel the viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PanelLayout {
    /// Filterable, color-coded data panel over several topics
    #[default]
    Full,
    /// Plain JSON printer for a single topic
    Simple,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
    #[serde(default = "default_simple_topic")]
    pub simple_topic: String,
    #[serde(default)]
    pub layout: PanelLayout,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub bootstrap_nodes: Vec<String>,
    #[serde(default = "default_window_title")]
    pub window_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            topics: default_topics(),
            simple_topic: default_simple_topic(),
            layout: PanelLayout::default(),
            listen_addr: default_listen_addr(),
            bootstrap_nodes: Vec::new(),
            window_title: default_window_title(),
        }
    }
}

impl AppConfig {
    /// Topics the subscriber registers for the configured layout.
    pub fn subscribed_topics(&self) -> Vec<String> {
        match self.layout {
            PanelLayout::Full => self.topics.clone(),
            PanelLayout::Simple => vec![self.simple_topic.clone()],
        }
    }
}

fn default_simple_topic() -> String {
    SIMPLE_TOPIC.to_string()
}

fn default_listen_addr() -> String {
    "/ip4/0.0.0.0/tcp/0".to_string()
}

fn default_window_title() -> String {
    "Topic Stream Viewer".to_string()
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}
