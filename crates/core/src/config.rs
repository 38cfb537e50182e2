//! TOML-based configuration for notification targets.
//!
//! The room API token is stored as a `token_env` field that references an
//! environment variable name; the actual secret is resolved at runtime via
//! [`RoomTarget::resolve_token`] and never lives in the file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

/// Top-level application configuration loaded from a TOML file.
///
/// Both targets are optional; callers check for the one their execution
/// mode requires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Room API target (domain + room id + bearer token reference).
    #[serde(default)]
    pub room: Option<RoomTarget>,

    /// Space webhook target.
    #[serde(default)]
    pub space: Option<SpaceTarget>,
}

/// Room API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomTarget {
    /// Scheme + host the room API lives on (e.g. `https://chat.example.com`).
    pub domain: String,

    /// Room identifier used in the notification path.
    pub room_id: String,

    /// Environment variable holding the bearer token.
    pub token_env: String,
}

impl RoomTarget {
    /// Resolve the bearer token from the environment.
    pub fn resolve_token(&self) -> Result<String, ConfigError> {
        std::env::var(&self.token_env).map_err(|_| ConfigError::EnvVarMissing {
            var: self.token_env.clone(),
            field: "room.token_env".into(),
        })
    }
}

/// Space webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceTarget {
    /// Full webhook URL, including any access key parameters.
    pub webhook_url: String,
}

impl AppConfig {
    /// Load and parse a configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }
}
