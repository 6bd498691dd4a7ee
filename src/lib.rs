//! # Gesture Link
//!
//! Remote gesture commands over TCP, turned into continuous actor motion that a
//! rendering/physics host consumes once per frame.
//!
//! ## Architecture Overview
//!
//! The crate is split along the two execution contexts it has to bridge:
//!
//! - **Input**: the closed [`Command`] vocabulary, its decoder, and the shared
//!   [`IntentState`] record guarded by [`SharedIntent`]
//! - **Net**: the [`CommandListener`] background task that accepts one client at
//!   a time and applies decoded commands to the shared intent
//! - **Motion**: the [`MotionController`] that reads intent once per tick and
//!   drives a [`PhysicsBody`] collaborator
//! - **Host**: [`GestureHost`], the `start` / `tick` / `shutdown` facade a game
//!   loop embeds
//!
//! The listener and the tick loop never share anything except the brief lock
//! around [`IntentState`].

pub mod config;
pub mod host;
pub mod input;
pub mod motion;
pub mod net;

pub use config::*;
pub use host::*;
pub use input::*;
pub use motion::*;
pub use net::*;

use std::net::SocketAddr;

/// Core error type for the gesture link.
///
/// Dropped connections and unrecognized tokens are recovered inside the
/// listener and never surface here.
#[derive(thiserror::Error, Debug)]
pub enum GestureError {
    /// The listening socket could not be bound
    #[error("Failed to bind command listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the gesture link.
pub type GestureResult<T> = Result<T, GestureError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
