//! Kinematic body component.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Velocity in world units per second.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    pub velocity: Vec2,
}

impl RigidBody {
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }
}
