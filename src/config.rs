//! Bridge configuration parsed from environment variables.

use std::time::Duration;

use crate::error::ErrorCode;

pub const DEFAULT_ROOT_OBJECT: &str = "mapComponent";
pub const DEFAULT_LAYER_MANAGER: &str = "vectorLayerManager";
pub const DEFAULT_ENTITY_MANAGER: &str = "entityManager";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be 'true' or 'false', got {value:?}")]
    InvalidBool { key: &'static str, value: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidNumber { .. } => "E_CONFIG_NUMBER",
            Self::InvalidBool { .. } => "E_CONFIG_BOOL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Script object every command path starts from.
    pub root_object: String,
    pub layer_manager: String,
    pub entity_manager: String,
    /// Resolve unanswered replies with `None` after this long. `None` waits forever.
    pub reply_timeout: Option<Duration>,
    /// Reject map commands until the renderer signals ready.
    pub require_ready: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            root_object: DEFAULT_ROOT_OBJECT.to_string(),
            layer_manager: DEFAULT_LAYER_MANAGER.to_string(),
            entity_manager: DEFAULT_ENTITY_MANAGER.to_string(),
            reply_timeout: None,
            require_ready: false,
        }
    }
}

impl BridgeConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `MAP_BRIDGE_ROOT_OBJECT`: default `mapComponent`
    /// - `MAP_BRIDGE_LAYER_MANAGER`: default `vectorLayerManager`
    /// - `MAP_BRIDGE_ENTITY_MANAGER`: default `entityManager`
    /// - `MAP_BRIDGE_REPLY_TIMEOUT_MS`: unset or `0` disables the timeout
    /// - `MAP_BRIDGE_REQUIRE_READY`: `true` or `false` (default)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a numeric or boolean variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BridgeConfig::from_env`] with a caller-supplied variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a numeric or boolean variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let root_object = lookup("MAP_BRIDGE_ROOT_OBJECT").unwrap_or_else(|| DEFAULT_ROOT_OBJECT.to_string());
        let layer_manager = lookup("MAP_BRIDGE_LAYER_MANAGER").unwrap_or_else(|| DEFAULT_LAYER_MANAGER.to_string());
        let entity_manager = lookup("MAP_BRIDGE_ENTITY_MANAGER").unwrap_or_else(|| DEFAULT_ENTITY_MANAGER.to_string());

        let timeout_ms = env_parse_u64(&lookup, "MAP_BRIDGE_REPLY_TIMEOUT_MS", 0)?;
        let reply_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        let require_ready = env_parse_bool(&lookup, "MAP_BRIDGE_REQUIRE_READY", false)?;

        Ok(Self { root_object, layer_manager, entity_manager, reply_timeout, require_ready })
    }

    #[must_use]
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_require_ready(mut self, require_ready: bool) -> Self {
        self.require_ready = require_ready;
        self
    }
}

fn env_parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
    }
}

fn env_parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key).as_deref().map(str::trim) {
        None => Ok(default),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(ConfigError::InvalidBool { key, value: other.to_string() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
