use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Client configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl ClientConfig {
    /// Base URL every API path is joined onto, e.g. `http://localhost:3000/api/`
    pub fn api_base(&self) -> String {
        let url = self.server.url.trim_end_matches('/');
        let path = self.server.api_path.trim_matches('/');
        if path.is_empty() {
            format!("{}/", url)
        } else {
            format!("{}/{}/", url, path)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_api_path")]
    pub api_path: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            url: default_url(),
            api_path: default_api_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Delay before reconnecting the event stream after it drops
    #[serde(default = "default_retry_ms")]
    pub retry_ms: u64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        LiveConfig {
            retry_ms: default_retry_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Below this terminal width the board shows a single swipeable column
    #[serde(default = "default_narrow_width")]
    pub narrow_width: u16,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            narrow_width: default_narrow_width(),
            colors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive, e.g. "info" or "openspec_board=debug"
    #[serde(default)]
    pub level: Option<String>,
    /// Log file for the TUI (default: state dir)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_api_path() -> String {
    "/api".to_string()
}

fn default_retry_ms() -> u64 {
    3000
}

fn default_narrow_width() -> u16 {
    80
}
