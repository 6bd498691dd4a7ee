//! # Physics Body
//!
//! The physics collaborator seam and a small headless body for running
//! without an engine.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul};

/// A 2D vector in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const UP: Vec2 = Vec2 { x: 0.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// The physics engine side of the actor the controller drives.
pub trait PhysicsBody {
    /// Current linear velocity.
    fn velocity(&self) -> Vec2;

    /// Overwrites the linear velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Applies an instantaneous impulse.
    fn apply_impulse(&mut self, impulse: Vec2);
}

/// Ground contact change reported by [`KinematicBody::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundContact {
    Entered,
    Exited,
}

/// Point mass over a flat floor at `y = 0`, integrated with explicit Euler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    /// Downward acceleration in units per second squared
    pub gravity: f32,
    grounded: bool,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl KinematicBody {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass: 1.0,
            gravity: 20.0,
            grounded: false,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Advances by `dt` seconds and reports a contact change, if any.
    pub fn step(&mut self, dt: f32) -> Option<GroundContact> {
        if !self.grounded {
            self.velocity.y -= self.gravity * dt;
        }
        self.position += self.velocity * dt;

        let touching = self.position.y <= 0.0 && self.velocity.y <= 0.0;
        if touching {
            self.position.y = 0.0;
            self.velocity.y = 0.0;
        }

        match (self.grounded, touching) {
            (false, true) => {
                self.grounded = true;
                Some(GroundContact::Entered)
            }
            (true, false) => {
                self.grounded = false;
                Some(GroundContact::Exited)
            }
            _ => None,
        }
    }
}

impl PhysicsBody for KinematicBody {
    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * (1.0 / self.mass);
    }
}
