//! # Host Module
//!
//! The lifecycle a game loop embeds: `start` once, `tick` every frame,
//! forward ground contact events, `shutdown` on teardown.

use crate::{
    CommandListener, GestureConfig, GestureResult, IntentState, ListenerStats, MotionController,
    MotionDecision, PhysicsBody, SharedIntent,
};
use log::info;
use std::net::SocketAddr;

/// A running gesture link: listener thread plus motion controller.
#[derive(Debug)]
pub struct GestureHost {
    intent: SharedIntent,
    listener: CommandListener,
    controller: MotionController,
    ticks: u64,
}

impl GestureHost {
    /// Validates the configuration, binds the listener and spawns it.
    pub fn start(config: GestureConfig) -> GestureResult<Self> {
        config.validate()?;

        let intent = SharedIntent::new();
        let listener = CommandListener::start(config.listener, intent.clone())?;
        let controller = MotionController::new(config.motion, intent.clone());

        info!(
            "Gesture host v{} started on {}",
            crate::VERSION,
            listener.local_addr()
        );

        Ok(Self {
            intent,
            listener,
            controller,
            ticks: 0,
        })
    }

    /// One frame: read intent and drive the body.
    pub fn tick(&mut self, body: &mut dyn PhysicsBody) -> MotionDecision {
        self.ticks += 1;
        self.controller.tick(body)
    }

    pub fn enter_ground(&mut self) {
        self.controller.enter_ground();
    }

    pub fn exit_ground(&mut self) {
        self.controller.exit_ground();
    }

    pub fn on_collision_enter(&mut self, tag: &str) {
        self.controller.on_collision_enter(tag);
    }

    pub fn on_collision_exit(&mut self, tag: &str) {
        self.controller.on_collision_exit(tag);
    }

    pub fn is_grounded(&self) -> bool {
        self.controller.is_grounded()
    }

    /// Current intent, for display or diagnostics.
    pub fn intent(&self) -> IntentState {
        self.intent.snapshot()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    pub fn stats(&self) -> ListenerStats {
        self.listener.stats()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    /// Closes the socket and any active connection and joins the listener.
    pub fn shutdown(&mut self) {
        self.listener.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GestureError, KinematicBody};

    #[test]
    fn test_start_rejects_invalid_config() {
        let mut config = GestureConfig::for_testing();
        config.motion.move_speed = -1.0;
        assert!(matches!(
            GestureHost::start(config),
            Err(GestureError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_ticks_without_client_stay_idle() {
        let mut host = GestureHost::start(GestureConfig::for_testing()).unwrap();
        let mut body = KinematicBody::default();

        for _ in 0..5 {
            let decision = host.tick(&mut body);
            assert_eq!(decision.velocity.x, 0.0);
            assert_eq!(decision.impulse, None);
        }
        assert_eq!(host.ticks(), 5);
        assert_eq!(host.intent(), IntentState::new());
        host.shutdown();
    }
}
