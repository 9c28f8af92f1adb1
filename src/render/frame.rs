//! Everything a draw call needs for one frame, bundled.

use glam::Mat4;
use log::warn;

use super::gpu::GpuContext;
use super::sprite::{SpriteDraw, SpriteRenderer};
use super::texturestore::{TextureHandle, TextureStore};

/// Borrowed GPU context, renderer, texture table and the view matrix in use.
pub struct FrameContext<'a, G: GpuContext> {
    pub gpu: &'a mut G,
    pub renderer: &'a SpriteRenderer,
    pub textures: &'a TextureStore,
    pub view: Mat4,
}

impl<'a, G: GpuContext> FrameContext<'a, G> {
    pub fn new(
        gpu: &'a mut G,
        renderer: &'a SpriteRenderer,
        textures: &'a TextureStore,
        view: Mat4,
    ) -> Self {
        Self {
            gpu,
            renderer,
            textures,
            view,
        }
    }

    /// Draw one sprite using the texture behind `texture`.
    ///
    /// Returns `false` without drawing if the handle is not in the store.
    pub fn sprite(&mut self, texture: TextureHandle, sprite: &SpriteDraw) -> bool {
        let Some(tex) = self.textures.get(texture) else {
            warn!("texture handle {:?} not in store, sprite skipped", texture);
            return false;
        };
        self.renderer.draw(&mut *self.gpu, tex.id, sprite, &self.view);
        true
    }
}
