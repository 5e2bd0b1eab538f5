//! Forum CLI configuration management
//!
//! Layered configuration loading: defaults, then `forum.toml`, then
//! `FORUM_*` environment variables, then command-line flags on top. The
//! client endpoints live under `[client]`, CLI behavior under `[cli]`.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use forum_client::ClientConfig;

use crate::error::Result;

/// Complete configuration for the forum CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Endpoints and session storage for the client core
    pub client: ClientConfig,

    /// CLI-specific configuration
    pub cli: CliConfig,
}

/// CLI-specific configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Enable verbose logging output
    pub verbose: bool,

    /// Default number of history messages to fetch
    pub history_limit: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            history_limit: 50,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut client = ClientConfig::default();
        client.session_file = default_session_file();
        Self {
            client,
            cli: CliConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration with priority: env vars > config file > defaults.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        let path = config_file.unwrap_or_else(|| Path::new("forum.toml"));
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        let config = figment
            .merge(Env::prefixed("FORUM_").split("__"))
            .extract()?;
        Ok(config)
    }
}

/// Default session file under the platform data directory, e.g.
/// `~/.local/share/forum/session.json`.
pub fn default_session_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("forum").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_a_config_file() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/forum.toml"))).unwrap();
        assert_eq!(config.cli.history_limit, 50);
        assert!(config.client.chat_url.ends_with("/ws/chat"));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forum.toml");
        std::fs::write(
            &path,
            r#"
[client]
auth_url = "http://forum.example:9000"
chat_url = "ws://forum.example:9000/ws/chat"

[cli]
history_limit = 10
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.client.auth_url, "http://forum.example:9000");
        assert_eq!(config.cli.history_limit, 10);
        // Unset keys keep their defaults
        assert!(!config.cli.verbose);
    }
}
