//! # Motion Module
//!
//! Turns the shared intent into one velocity decision per host tick.
//!
//! The controller never sets vertical velocity itself; it only passes the
//! body's current vertical component through and, when a jump fires, asks for
//! an upward impulse.

pub mod body;

pub use body::*;

use crate::{SharedIntent, DEFAULT_GROUND_TAG, DEFAULT_JUMP_FORCE, DEFAULT_MOVE_SPEED};
use log::debug;
use serde::{Deserialize, Serialize};

/// Tunables for the motion controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Horizontal speed while a move command is held
    pub move_speed: f32,
    /// Upward impulse applied when a jump fires
    pub jump_force: f32,
    /// Collision tag treated as ground
    pub ground_tag: String,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            jump_force: DEFAULT_JUMP_FORCE,
            ground_tag: DEFAULT_GROUND_TAG.to_string(),
        }
    }
}

/// What one tick asks of the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionDecision {
    /// Velocity to set; `y` is the body's own vertical velocity
    pub velocity: Vec2,
    /// Impulse to apply after setting velocity, if a jump fired
    pub impulse: Option<Vec2>,
}

/// Per-tick consumer of [`crate::IntentState`].
#[derive(Debug)]
pub struct MotionController {
    config: MotionConfig,
    intent: SharedIntent,
    grounded: bool,
    jumps_fired: u64,
}

impl MotionController {
    pub fn new(config: MotionConfig, intent: SharedIntent) -> Self {
        Self {
            config,
            intent,
            grounded: false,
            jumps_fired: 0,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Jumps fired since creation.
    pub fn jumps_fired(&self) -> u64 {
        self.jumps_fired
    }

    pub fn enter_ground(&mut self) {
        self.grounded = true;
    }

    pub fn exit_ground(&mut self) {
        self.grounded = false;
    }

    /// Collision-enter event from the physics collaborator.
    pub fn on_collision_enter(&mut self, tag: &str) {
        if tag == self.config.ground_tag {
            self.enter_ground();
        }
    }

    /// Collision-exit event from the physics collaborator.
    pub fn on_collision_exit(&mut self, tag: &str) {
        if tag == self.config.ground_tag {
            self.exit_ground();
        }
    }

    /// Computes this tick's decision from the current vertical velocity.
    ///
    /// A requested jump fires only while grounded and is consumed when it
    /// does; otherwise it stays pending for a later grounded tick.
    pub fn decide(&mut self, current_velocity: Vec2) -> MotionDecision {
        let (observed, fired) = self.intent.consume(self.grounded);

        let velocity = Vec2::new(
            observed.horizontal_axis() * self.config.move_speed,
            current_velocity.y,
        );
        let impulse = fired.then(|| Vec2::UP * self.config.jump_force);
        if fired {
            self.jumps_fired += 1;
            debug!("Jump fired with force {}", self.config.jump_force);
        }

        MotionDecision { velocity, impulse }
    }

    /// Decides and applies: exactly one velocity set and at most one impulse.
    pub fn tick(&mut self, body: &mut dyn PhysicsBody) -> MotionDecision {
        let decision = self.decide(body.velocity());
        body.set_velocity(decision.velocity);
        if let Some(impulse) = decision.impulse {
            body.apply_impulse(impulse);
        }
        decision
    }
}
