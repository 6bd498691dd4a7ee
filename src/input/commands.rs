//! # Command Definitions
//!
//! The gesture vocabulary and the decoder from wire tokens to commands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One decoded member of the gesture vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Hold leftward movement
    MoveLeft,
    /// Hold rightward movement
    MoveRight,
    /// Request a single jump
    Jump,
    /// Release any held movement
    Stop,
    /// Token outside the vocabulary
    Unknown,
}

impl Command {
    /// Every command that has a wire spelling.
    pub const ALL: [Command; 4] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::Jump,
        Command::Stop,
    ];

    /// The exact token a client sends for this command.
    pub fn as_token(self) -> Option<&'static str> {
        match self {
            Command::MoveLeft => Some("LEFT"),
            Command::MoveRight => Some("RIGHT"),
            Command::Jump => Some("JUMP"),
            Command::Stop => Some("STOP"),
            Command::Unknown => None,
        }
    }

    /// Whether this command changes intent when applied.
    pub fn is_known(self) -> bool {
        self != Command::Unknown
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token().unwrap_or("<unknown>"))
    }
}

/// Decodes one trimmed token. Matching is exact and case-sensitive.
///
/// # Examples
///
/// ```
/// use gesture_link::{decode, Command};
///
/// assert_eq!(decode("LEFT"), Command::MoveLeft);
/// assert_eq!(decode("left"), Command::Unknown);
/// ```
pub fn decode(token: &str) -> Command {
    match token {
        "LEFT" => Command::MoveLeft,
        "RIGHT" => Command::MoveRight,
        "JUMP" => Command::Jump,
        "STOP" => Command::Stop,
        _ => Command::Unknown,
    }
}
