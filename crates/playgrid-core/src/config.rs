//! playgrid.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub fabric: FabricConfig,
    #[serde(default)]
    pub games: Vec<GameConfig>,
}

/// HTTP API listen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    #[serde(default)]
    pub debug: bool,
}

/// Connection parameters for the remote streaming fabric.
///
/// The gateway speaks token-authenticated REST; the management service
/// requires client-certificate mTLS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Streaming gateway base URL.
    pub gateway_address: String,
    /// API token appended to gateway requests.
    pub api_token: String,
    /// Management service base URL.
    pub management_address: String,
    /// Path to the client certificate (PEM).
    pub client_cert: String,
    /// Path to the client private key (PEM).
    pub client_key: String,
}

/// Per-game configuration block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    pub session_config: Option<SessionConfig>,
    pub runtime: RuntimeConfig,
}

/// Session pool sizing and display parameters for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Target floor; the reconciler tops the pool up to this.
    pub min: usize,
    /// Hard ceiling; the reconciler never requests creation beyond this.
    pub max: usize,
    /// Stale-client cutoff (e.g., "5m"). Defaults to 5 minutes.
    pub heartbeat_timeout: Option<String>,
    /// Remote reconcile period (e.g., "30s"). Defaults to 30 seconds.
    pub sync_interval: Option<String>,
    pub screen: ScreenConfig,
}

/// Display parameters forwarded verbatim in session create requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
    pub density: u32,
    pub fps: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 1240,
            density: 320,
            fps: 30,
        }
    }
}

/// Game runtime parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Session TTL (e.g., "10m"); a session older than this is reclaimed.
    pub time_over: String,
    /// Optional URL notified when a session's time is over.
    pub over_url: Option<String>,
}

impl ServiceConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Parse a duration string like "500ms", "30s", "5m", "2h".
///
/// A bare number is taken as seconds. Returns `None` for anything else.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else if let Some(hours) = s.strip_suffix('h') {
        hours
            .parse::<u64>()
            .ok()
            .map(|h| Duration::from_secs(h * 3600))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_values() {
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("2h"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_duration("45"), Some(Duration::from_secs(45)));
        assert_eq!(parse_duration("soon"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[server]
address = "0.0.0.0:2222"
debug = true

[fabric]
gateway_address = "https://gateway.example.com"
api_token = "secret"
management_address = "mgmt.example.com:8444"
client_cert = "/etc/playgrid/client.crt"
client_key = "/etc/playgrid/client.key"

[[games]]
name = "idle_weapon"

[games.session_config]
min = 5
max = 10

[games.session_config.screen]
width = 720
height = 1240
density = 320
fps = 30

[games.runtime]
time_over = "10m"
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:2222");
        assert!(config.server.debug);
        assert_eq!(config.games.len(), 1);

        let game = &config.games[0];
        assert_eq!(game.name, "idle_weapon");
        let session = game.session_config.as_ref().unwrap();
        assert_eq!(session.min, 5);
        assert_eq!(session.max, 10);
        assert_eq!(session.screen.width, 720);
        assert!(session.heartbeat_timeout.is_none());
        assert_eq!(game.runtime.time_over, "10m");
    }

    #[test]
    fn session_config_is_optional() {
        let toml_str = r#"
[server]
address = "127.0.0.1:2222"

[fabric]
gateway_address = "https://gateway.example.com"
api_token = "secret"
management_address = "mgmt.example.com:8444"
client_cert = "client.crt"
client_key = "client.key"

[[games]]
name = "broken"

[games.runtime]
time_over = "5m"
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert!(config.games[0].session_config.is_none());
    }
}
