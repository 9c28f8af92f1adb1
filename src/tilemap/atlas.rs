//! Tile atlas: one texture cut into a uniform grid of tile images.

use glam::Vec2;

use super::TilemapError;
use crate::render::sprite::UvRect;
use crate::render::texturestore::TextureHandle;

/// Texture handle plus the atlas grid shape, tile `0` at the top-left,
/// indices running left-to-right then top-to-bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atlas {
    pub texture: TextureHandle,
    tiles_across: u32,
    tiles_down: u32,
}

impl Atlas {
    pub fn new(
        texture: TextureHandle,
        tiles_across: u32,
        tiles_down: u32,
    ) -> Result<Self, TilemapError> {
        if tiles_across == 0
            || tiles_down == 0
            || tiles_across.checked_mul(tiles_down).is_none()
        {
            return Err(TilemapError::InvalidAtlasShape {
                across: tiles_across,
                down: tiles_down,
            });
        }
        Ok(Self {
            texture,
            tiles_across,
            tiles_down,
        })
    }

    pub fn tiles_across(&self) -> u32 {
        self.tiles_across
    }

    pub fn tiles_down(&self) -> u32 {
        self.tiles_down
    }

    /// Never overflows: [`Atlas::new`] rejects shapes whose product does not
    /// fit in a `u32`.
    pub fn tile_count(&self) -> u32 {
        self.tiles_across * self.tiles_down
    }

    /// UV rectangle of tile `index`.
    ///
    /// Indices past the last tile are not rejected; they yield offsets beyond
    /// `1.0` on the v axis.
    pub fn uv_rect(&self, index: u32) -> UvRect {
        let step = Vec2::new(
            1.0 / self.tiles_across as f32,
            1.0 / self.tiles_down as f32,
        );
        let cell = Vec2::new(
            (index % self.tiles_across) as f32,
            (index / self.tiles_across) as f32,
        );
        UvRect::new(cell * step, step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::gpu::{GpuTexture, TextureId};
    use crate::render::texturestore::TextureStore;

    fn handle() -> TextureHandle {
        let mut store = TextureStore::new();
        store.insert(
            "atlas",
            GpuTexture {
                id: TextureId(1),
                width: 64,
                height: 16,
            },
        )
    }

    #[test]
    fn test_four_by_one_index_two() {
        let atlas = Atlas::new(handle(), 4, 1).unwrap();
        let uv = atlas.uv_rect(2);
        assert_eq!(uv.offset, Vec2::new(0.5, 0.0));
        assert_eq!(uv.size, Vec2::new(0.25, 1.0));
    }

    #[test]
    fn test_every_index_matches_formula() {
        let (across, down) = (6u32, 4u32);
        let atlas = Atlas::new(handle(), across, down).unwrap();
        for i in 0..across * down {
            let uv = atlas.uv_rect(i);
            let expected = Vec2::new(
                (i % across) as f32 / across as f32,
                (i / across) as f32 / down as f32,
            );
            assert!((uv.offset - expected).abs().max_element() < 1e-6, "i={i}");
            assert!(
                (uv.size - Vec2::new(1.0 / across as f32, 1.0 / down as f32))
                    .abs()
                    .max_element()
                    < 1e-6
            );
        }
    }

    #[test]
    fn test_zero_shape_rejected() {
        assert!(matches!(
            Atlas::new(handle(), 0, 3),
            Err(TilemapError::InvalidAtlasShape { across: 0, down: 3 })
        ));
    }

    #[test]
    fn test_overflowing_shape_rejected() {
        assert!(matches!(
            Atlas::new(handle(), 65536, 65536),
            Err(TilemapError::InvalidAtlasShape {
                across: 65536,
                down: 65536
            })
        ));
        let widest = Atlas::new(handle(), u32::MAX, 1).unwrap();
        assert_eq!(widest.tile_count(), u32::MAX);
    }
}
