//! Configuration settings for the stim client.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ClientError;

/// Hard upper bound on message size, framed. The stim wire protocol
/// never carries messages larger than this.
pub const MAX_MESSAGE_SIZE: usize = 16384;

/// The hardwired TCP/IP address for the stimulus-control server.
pub const STIM_INET_ADDRESS: &str = "100.0.0.1";

/// Default port for the stimulus-control server.
pub const DEFAULT_STIM_PORT: u16 = 4610;

/// Main configuration structure for the client.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub framing: FramingConfig,
}

/// Endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Server hostname or address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Server TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum framed message size in bytes (capped at 16384).
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Reply timeout in seconds.
    #[serde(default = "default_reply_timeout")]
    pub reply_timeout_seconds: u64,
}

/// Framing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FramingConfig {
    /// Message terminator. Exactly one byte; owned by the peer protocol,
    /// so it is configurable rather than baked in.
    #[serde(default = "default_terminator")]
    pub terminator: String,
}

// Default value functions
fn default_host() -> String {
    STIM_INET_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_STIM_PORT
}

fn default_max_message_size() -> usize {
    MAX_MESSAGE_SIZE
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_reply_timeout() -> u64 {
    10
}

fn default_terminator() -> String {
    "\n".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
            connect_timeout_seconds: default_connect_timeout(),
            reply_timeout_seconds: default_reply_timeout(),
        }
    }
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            terminator: default_terminator(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            limits: LimitsConfig::default(),
            framing: FramingConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ClientError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| ClientError::Config {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.limits.max_message_size == 0 || self.limits.max_message_size > MAX_MESSAGE_SIZE {
            return Err(ClientError::Config {
                message: format!(
                    "Invalid max_message_size {}. Must be between 1 and {}",
                    self.limits.max_message_size, MAX_MESSAGE_SIZE
                ),
            });
        }

        if self.framing.terminator.as_bytes().len() != 1 {
            return Err(ClientError::Config {
                message: format!(
                    "Invalid terminator {:?}. Must be exactly one byte",
                    self.framing.terminator
                ),
            });
        }

        if self.limits.connect_timeout_seconds == 0 || self.limits.reply_timeout_seconds == 0 {
            return Err(ClientError::Config {
                message: "Timeouts must be nonzero".to_string(),
            });
        }

        Ok(())
    }

    /// The terminator as a single byte. Valid after `validate`.
    pub fn terminator_byte(&self) -> u8 {
        self.framing.terminator.as_bytes().first().copied().unwrap_or(b'\n')
    }

    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.limits.connect_timeout_seconds)
    }

    /// Reply timeout as a `Duration`.
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.limits.reply_timeout_seconds)
    }
}
