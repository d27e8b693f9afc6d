/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed map client configuration
[POS]:    Configuration layer - backend, storage and default view setup
[UPDATE]: When adding new configuration options
*/

use std::path::PathBuf;
use std::time::Duration;

use helper_map_adapter::{ClientConfig, Coordinate};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the map client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapConfig {
    /// Marketplace backend base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Directory of the shared local storage; platform data dir when unset
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    /// View shown when no location can be resolved
    #[serde(default)]
    pub default_view: DefaultView,
    /// Live position fix, used when no coordinates are given on the command line
    #[serde(default)]
    pub position: Option<Coordinate>,
}

/// Fallback map view
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DefaultView {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

impl DefaultView {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

impl Default for DefaultView {
    fn default() -> Self {
        Self {
            lat: 51.505,
            lng: -0.09,
            zoom: 13,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            storage_dir: None,
            default_view: DefaultView::default(),
            position: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl MapConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}
