use bevy_ecs::prelude::Component;
use glam::Vec2;

/// World-space position of an entity's top-left corner.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
