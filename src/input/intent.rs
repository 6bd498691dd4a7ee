//! # Intent State
//!
//! The latest movement and jump request, shared between the command listener
//! and the tick loop.

use crate::Command;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// Current movement intent.
///
/// `move_left` and `move_right` are never both set. `jump_requested` is a
/// one-shot latch cleared only by [`IntentState::take_jump`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentState {
    move_left: bool,
    move_right: bool,
    jump_requested: bool,
}

impl IntentState {
    /// All flags cleared.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_left(&self) -> bool {
        self.move_left
    }

    pub fn move_right(&self) -> bool {
        self.move_right
    }

    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// -1 for left, 1 for right, 0 when idle.
    pub fn horizontal_axis(&self) -> f32 {
        if self.move_left {
            -1.0
        } else if self.move_right {
            1.0
        } else {
            0.0
        }
    }

    /// Applies one decoded command. Unknown commands change nothing.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => {
                self.move_left = true;
                self.move_right = false;
            }
            Command::MoveRight => {
                self.move_right = true;
                self.move_left = false;
            }
            Command::Jump => self.jump_requested = true,
            Command::Stop => {
                self.move_left = false;
                self.move_right = false;
            }
            Command::Unknown => {}
        }
    }

    /// Consumes a pending jump if the actor is grounded.
    ///
    /// Returns `true` exactly when a jump should fire. An ungrounded request
    /// stays latched for a later tick.
    pub fn take_jump(&mut self, grounded: bool) -> bool {
        if self.jump_requested && grounded {
            self.jump_requested = false;
            true
        } else {
            false
        }
    }
}

/// Handle to the single guarded [`IntentState`] both contexts share.
///
/// Every read and write locks the whole record, so an observer never sees a
/// half-applied command.
#[derive(Debug, Clone, Default)]
pub struct SharedIntent {
    inner: Arc<Mutex<IntentState>>,
}

impl SharedIntent {
    pub fn new() -> Self {
        Self::default()
    }

    // The record is plain flags and valid after any partial panic.
    fn lock(&self) -> MutexGuard<'_, IntentState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applies a command under the lock.
    pub fn apply(&self, command: Command) {
        self.lock().apply(command);
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> IntentState {
        *self.lock()
    }

    /// Reads the record and consumes a grounded jump in one critical section.
    ///
    /// Returns the state as observed before the jump flag was cleared and
    /// whether the jump fired.
    pub fn consume(&self, grounded: bool) -> (IntentState, bool) {
        let mut state = self.lock();
        let observed = *state;
        let fired = state.take_jump(grounded);
        (observed, fired)
    }

    /// Clears every flag.
    pub fn reset(&self) {
        *self.lock() = IntentState::new();
    }
}
