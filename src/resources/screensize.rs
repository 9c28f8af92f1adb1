//! Screen size resource.
//!
//! Stores the current framebuffer dimensions in pixels. The projection matrix
//! and the ball's edge bounces both read it.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

/// Current screen size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub w: i32,
    pub h: i32,
}

impl ScreenSize {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.w as f32, self.h as f32)
    }
}
