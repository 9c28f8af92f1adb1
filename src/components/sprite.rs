use bevy_ecs::prelude::Component;
use glam::{Vec2, Vec3};

use crate::render::sprite::UvRect;
use crate::render::texturestore::TextureHandle;

/// A textured quad drawn at the entity's [`MapPosition`](super::mapposition::MapPosition).
///
/// `uv` selects a region of the texture (the whole texture by default),
/// `color` tints it and `mirror` flips it horizontally in place. `rotation` is
/// in degrees about the sprite's centre.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub texture: TextureHandle,
    pub size: Vec2,
    pub rotation: f32,
    pub color: Vec3,
    pub uv: UvRect,
    pub mirror: bool,
}

impl Sprite {
    pub fn new(texture: TextureHandle, size: Vec2) -> Self {
        Self {
            texture,
            size,
            rotation: 0.0,
            color: Vec3::ONE,
            uv: UvRect::FULL,
            mirror: false,
        }
    }
}
