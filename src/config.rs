//! # Configuration
//!
//! Defaults, file loading, and validation for every tunable of the gesture link.

use crate::{GestureError, GestureResult, MotionConfig};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

/// Port the gesture client connects to
pub const DEFAULT_PORT: u16 = 65432;

/// Upper bound on a single read from the active connection
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// Residual bytes kept across reads in delimited mode before they are dropped
pub const DEFAULT_MAX_RESIDUAL_BYTES: usize = 4096;

/// Horizontal speed applied while a move command is held
pub const DEFAULT_MOVE_SPEED: f32 = 5.0;

/// Magnitude of the upward jump impulse
pub const DEFAULT_JUMP_FORCE: f32 = 10.0;

/// Collision tag that counts as standing on the ground
pub const DEFAULT_GROUND_TAG: &str = "Ground";

/// Frames per second target for the headless host loop
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// How the byte stream of one connection is cut into command tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenMode {
    /// Each read chunk is one trimmed token. Several commands arriving in one
    /// TCP segment decode as a single unknown token.
    #[default]
    WholeChunk,
    /// Tokens are separated by ASCII whitespace; a partial trailing token is
    /// carried into the next read.
    Delimited,
}

/// Network listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind; all local interfaces by default
    pub bind_address: IpAddr,
    /// TCP port; 0 lets the OS choose
    pub port: u16,
    /// Maximum bytes taken per read call
    pub read_chunk_size: usize,
    /// Tokenization strategy
    pub token_mode: TokenMode,
    /// Residual cap for [`TokenMode::Delimited`]
    pub max_residual_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            token_mode: TokenMode::WholeChunk,
            max_residual_bytes: DEFAULT_MAX_RESIDUAL_BYTES,
        }
    }
}

impl ListenerConfig {
    /// Listener bound to loopback on an OS-assigned port.
    pub fn for_testing() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            ..Self::default()
        }
    }

    /// Rejects settings under which no command could ever be read.
    pub fn validate(&self) -> GestureResult<()> {
        if self.read_chunk_size == 0 {
            return Err(GestureError::InvalidConfig(
                "read_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.token_mode == TokenMode::Delimited
            && self.max_residual_bytes < self.read_chunk_size
        {
            return Err(GestureError::InvalidConfig(format!(
                "max_residual_bytes ({}) must be at least read_chunk_size ({})",
                self.max_residual_bytes, self.read_chunk_size
            )));
        }
        Ok(())
    }

    /// The socket address the listener binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

/// Settings for the headless host loop in the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub tick_rate_hz: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

/// Complete configuration for a [`crate::GestureHost`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub listener: ListenerConfig,
    pub motion: MotionConfig,
    pub host: HostConfig,
}

impl GestureConfig {
    /// Configuration suitable for tests: loopback, ephemeral port.
    pub fn for_testing() -> Self {
        Self {
            listener: ListenerConfig::for_testing(),
            ..Self::default()
        }
    }

    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> GestureResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> GestureResult<()> {
        self.listener.validate()?;
        if !self.motion.move_speed.is_finite() || self.motion.move_speed < 0.0 {
            return Err(GestureError::InvalidConfig(format!(
                "move_speed must be a non-negative number, got {}",
                self.motion.move_speed
            )));
        }
        if !self.motion.jump_force.is_finite() || self.motion.jump_force < 0.0 {
            return Err(GestureError::InvalidConfig(format!(
                "jump_force must be a non-negative number, got {}",
                self.motion.jump_force
            )));
        }
        if self.host.tick_rate_hz == 0 {
            return Err(GestureError::InvalidConfig(
                "tick_rate_hz must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_gesture_client() {
        let config = GestureConfig::default();
        assert_eq!(config.listener.port, 65432);
        assert_eq!(config.listener.read_chunk_size, 1024);
        assert_eq!(config.listener.token_mode, TokenMode::WholeChunk);
        assert!(config.listener.bind_address.is_unspecified());
        assert_eq!(config.motion.move_speed, 5.0);
        assert_eq!(config.motion.jump_force, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GestureConfig =
            serde_json::from_str(r#"{ "listener": { "port": 7000, "token_mode": "delimited" } }"#)
                .unwrap();
        assert_eq!(config.listener.port, 7000);
        assert_eq!(config.listener.token_mode, TokenMode::Delimited);
        assert_eq!(config.listener.read_chunk_size, DEFAULT_READ_CHUNK_SIZE);
        assert_eq!(config.motion.ground_tag, DEFAULT_GROUND_TAG);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = GestureConfig::default();
        config.listener.read_chunk_size = 0;
        assert!(matches!(
            config.validate(),
            Err(GestureError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_residual_smaller_than_chunk_rejected_only_when_delimited() {
        let mut config = GestureConfig::default();
        config.listener.max_residual_bytes = 16;
        assert!(config.validate().is_ok());

        config.listener.token_mode = TokenMode::Delimited;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_motion_rejected() {
        let mut config = GestureConfig::default();
        config.motion.move_speed = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = GestureConfig::default();
        config.motion.jump_force = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut config = GestureConfig::default();
        config.host.tick_rate_hz = 0;
        assert!(config.validate().is_err());
    }
}
