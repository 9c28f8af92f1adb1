//! Tile store and tilemap draw loop.
//!
//! A [`Tilemap`] is built from a rectangular grid of atlas indices and a world
//! extent to cover. Every cell becomes one immutable [`Tile`] carrying its
//! world rectangle, atlas UV rectangle, index and solidity. Loading a new grid
//! throws the previous tile list away in full.
//!
//! Drawing walks the tile list in row-major order and issues one sprite draw
//! per tile. Layering between tiles, background and entities is purely call
//! order; there is no depth buffer.

pub mod atlas;
pub mod level;

use std::path::PathBuf;

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use log::{debug, info, warn};
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::render::frame::FrameContext;
use crate::render::gpu::{GpuContext, GpuError};
use crate::render::sprite::{SpriteDraw, UvRect};
use crate::render::texturestore::TextureHandle;

pub use atlas::Atlas;
pub use level::LevelDescription;

#[derive(Debug, Error)]
pub enum TilemapError {
    #[error("tile grid has no rows or no columns")]
    EmptyGrid,
    #[error("tile grid row {row} has {found} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("atlas must be at least 1x1 tiles with a tile count fitting u32, got {across}x{down}")]
    InvalidAtlasShape { across: u32, down: u32 },
    #[error("level size must be positive and finite, got {width}x{height}")]
    InvalidLevelSize { width: f32, height: f32 },
    #[error("failed to read level {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse level {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Texture(#[from] GpuError),
}

/// One placed tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub position: Vec2,
    pub size: Vec2,
    pub uv: UvRect,
    pub id: u32,
    /// Collision hint; the renderer ignores it.
    pub solid: bool,
}

/// Decides which tile indices are solid: everything except the listed indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solidity {
    non_solid: FxHashSet<u32>,
}

impl Solidity {
    pub fn all_except(non_solid: impl IntoIterator<Item = u32>) -> Self {
        Self {
            non_solid: non_solid.into_iter().collect(),
        }
    }

    pub fn is_solid(&self, index: u32) -> bool {
        !self.non_solid.contains(&index)
    }
}

impl Default for Solidity {
    /// Index `0` is the empty tile.
    fn default() -> Self {
        Self::all_except([0])
    }
}

#[derive(Resource, Debug)]
pub struct Tilemap {
    atlas: Atlas,
    background: Option<TextureHandle>,
    solidity: Solidity,
    tiles: Vec<Tile>,
    rows: usize,
    columns: usize,
    tile_size: Vec2,
}

impl Tilemap {
    pub fn new(atlas: Atlas) -> Self {
        Self {
            atlas,
            background: None,
            solidity: Solidity::default(),
            tiles: Vec::new(),
            rows: 0,
            columns: 0,
            tile_size: Vec2::ZERO,
        }
    }

    pub fn with_background(mut self, background: TextureHandle) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_solidity(mut self, solidity: Solidity) -> Self {
        self.solidity = solidity;
        self
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn background(&self) -> Option<TextureHandle> {
        self.background
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// `(rows, columns)` of the loaded grid.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Replace the tile list with one built from `grid`, covering
    /// `level_width × level_height` world units.
    ///
    /// The grid must be non-empty and rectangular. On error the previous
    /// tiles are left untouched.
    pub fn load<R: AsRef<[u32]>>(
        &mut self,
        grid: &[R],
        level_width: f32,
        level_height: f32,
    ) -> Result<(), TilemapError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(level_width) || !valid(level_height) {
            return Err(TilemapError::InvalidLevelSize {
                width: level_width,
                height: level_height,
            });
        }

        let rows = grid.len();
        let columns = grid.first().map_or(0, |r| r.as_ref().len());
        if rows == 0 || columns == 0 {
            return Err(TilemapError::EmptyGrid);
        }
        if let Some((row, found)) = grid
            .iter()
            .map(|r| r.as_ref().len())
            .enumerate()
            .find(|(_, len)| *len != columns)
        {
            return Err(TilemapError::RaggedGrid {
                row,
                expected: columns,
                found,
            });
        }

        let tile_size = Vec2::new(level_width / columns as f32, level_height / rows as f32);
        let mut tiles = Vec::with_capacity(rows * columns);
        for (r, row) in grid.iter().enumerate() {
            for (c, &index) in row.as_ref().iter().enumerate() {
                tiles.push(Tile {
                    position: Vec2::new(c as f32 * tile_size.x, r as f32 * tile_size.y),
                    size: tile_size,
                    uv: self.atlas.uv_rect(index),
                    id: index,
                    solid: self.solidity.is_solid(index),
                });
            }
        }

        self.tiles = tiles;
        self.rows = rows;
        self.columns = columns;
        self.tile_size = tile_size;
        info!(
            "Loaded tilemap {}x{} ({} tiles of {}x{})",
            columns,
            rows,
            self.tiles.len(),
            tile_size.x,
            tile_size.y
        );
        Ok(())
    }

    /// Lay every atlas tile out in index order over a `columns × rows` grid,
    /// wrapping once the atlas runs out.
    pub fn load_atlas_preview(
        &mut self,
        columns: usize,
        rows: usize,
        level_width: f32,
        level_height: f32,
    ) -> Result<(), TilemapError> {
        let count = self.atlas.tile_count() as usize;
        let grid: Vec<Vec<u32>> = (0..rows)
            .map(|r| {
                (0..columns)
                    .map(|c| ((r * columns + c) % count) as u32)
                    .collect()
            })
            .collect();
        self.load(&grid, level_width, level_height)
    }

    /// The tile whose rectangle contains `point`.
    pub fn tile_at(&self, point: Vec2) -> Option<&Tile> {
        if self.tiles.is_empty() || !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / self.tile_size.x).floor() as usize;
        let row = (point.y / self.tile_size.y).floor() as usize;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.tiles.get(row * self.columns + column)
    }

    /// Whether `point` lies on a solid tile. Points off the map are not solid.
    pub fn is_solid_at(&self, point: Vec2) -> bool {
        self.tile_at(point).is_some_and(|t| t.solid)
    }

    /// Draw every tile with the atlas texture, no rotation and a white tint.
    pub fn draw<G: GpuContext>(&self, frame: &mut FrameContext<'_, G>) {
        for tile in &self.tiles {
            let sprite = SpriteDraw::new(tile.position, tile.size).uv(tile.uv);
            if !frame.sprite(self.atlas.texture, &sprite) {
                return;
            }
        }
        debug!("drew {} tiles", self.tiles.len());
    }

    /// One full-screen quad with the background texture, independent of the tiles.
    pub fn draw_background<G: GpuContext>(
        &self,
        frame: &mut FrameContext<'_, G>,
        width: f32,
        height: f32,
    ) {
        let Some(background) = self.background else {
            warn!("tilemap has no background texture, nothing drawn");
            return;
        };
        frame.sprite(
            background,
            &SpriteDraw::new(Vec2::ZERO, Vec2::new(width, height)),
        );
    }

    /// One extra sprite from the atlas, e.g. an animated player.
    ///
    /// Whether it ends up behind or in front of the tiles depends only on
    /// whether it is called before or after [`Tilemap::draw`].
    pub fn draw_player_layer<G: GpuContext>(
        &self,
        frame: &mut FrameContext<'_, G>,
        position: Vec2,
        size: Vec2,
        tile_index: u32,
    ) {
        let sprite = SpriteDraw::new(position, size).uv(self.atlas.uv_rect(tile_index));
        frame.sprite(self.atlas.texture, &sprite);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::gpu::{GpuTexture, TextureId};
    use crate::render::texturestore::TextureStore;

    fn tilemap(across: u32, down: u32) -> Tilemap {
        let mut store = TextureStore::new();
        let tex = store.insert(
            "atlas",
            GpuTexture {
                id: TextureId(1),
                width: 64,
                height: 64,
            },
        );
        Tilemap::new(Atlas::new(tex, across, down).unwrap())
    }

    #[test]
    fn test_two_by_two_example() {
        let mut map = tilemap(2, 2);
        map.load(&[[0u32, 1], [2, 3]], 200.0, 100.0).unwrap();
        assert_eq!(map.tiles().len(), 4);
        let t = map.tiles()[2];
        assert_eq!(t.id, 2);
        assert_eq!(t.position, Vec2::new(0.0, 50.0));
        assert_eq!(t.size, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_positions_and_sizes_for_every_cell() {
        let mut map = tilemap(4, 4);
        let (rows, cols) = (3usize, 5usize);
        let grid: Vec<Vec<u32>> = (0..rows)
            .map(|r| (0..cols).map(|c| ((r + c) % 16) as u32).collect())
            .collect();
        map.load(&grid, 500.0, 90.0).unwrap();
        assert_eq!(map.grid_shape(), (rows, cols));
        for r in 0..rows {
            for c in 0..cols {
                let t = map.tiles()[r * cols + c];
                let expected = Vec2::new(c as f32 * 500.0 / cols as f32, r as f32 * 90.0 / rows as f32);
                assert!((t.position - expected).abs().max_element() < 1e-4);
                assert!((t.size - Vec2::new(100.0, 30.0)).abs().max_element() < 1e-4);
            }
        }
    }

    #[test]
    fn test_reload_replaces_everything() {
        let mut a = tilemap(4, 1);
        a.load(&[[1u32, 1, 1], [1, 1, 1]], 30.0, 20.0).unwrap();
        a.load(&[[3u32], [2], [0]], 10.0, 30.0).unwrap();

        let mut b = tilemap(4, 1);
        b.load(&[[3u32], [2], [0]], 10.0, 30.0).unwrap();

        assert_eq!(a.tiles(), b.tiles());
        assert_eq!(a.grid_shape(), (3, 1));
    }

    #[test]
    fn test_ragged_grid_rejected_and_previous_kept() {
        let mut map = tilemap(4, 1);
        map.load(&[[1u32, 2]], 20.0, 10.0).unwrap();
        let grid: Vec<Vec<u32>> = vec![vec![1, 2, 3], vec![1, 2]];
        let err = map.load(&grid, 30.0, 20.0).unwrap_err();
        assert!(matches!(
            err,
            TilemapError::RaggedGrid {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
        assert_eq!(map.tiles().len(), 2);
    }

    #[test]
    fn test_empty_grid_rejected() {
        let mut map = tilemap(4, 1);
        let empty: Vec<Vec<u32>> = Vec::new();
        assert!(matches!(map.load(&empty, 1.0, 1.0), Err(TilemapError::EmptyGrid)));
        let no_cols: Vec<Vec<u32>> = vec![vec![]];
        assert!(matches!(map.load(&no_cols, 1.0, 1.0), Err(TilemapError::EmptyGrid)));
    }

    #[test]
    fn test_bad_level_size_rejected() {
        let mut map = tilemap(4, 1);
        assert!(matches!(
            map.load(&[[0u32]], 0.0, 10.0),
            Err(TilemapError::InvalidLevelSize { .. })
        ));
        assert!(matches!(
            map.load(&[[0u32]], 10.0, f32::NAN),
            Err(TilemapError::InvalidLevelSize { .. })
        ));
    }

    #[test]
    fn test_solidity_rule() {
        let mut map = tilemap(4, 1).with_solidity(Solidity::all_except([0, 3]));
        map.load(&[[0u32, 1, 2, 3]], 40.0, 10.0).unwrap();
        let solid: Vec<bool> = map.tiles().iter().map(|t| t.solid).collect();
        assert_eq!(solid, vec![false, true, true, false]);
    }

    #[test]
    fn test_tile_queries() {
        let mut map = tilemap(4, 1);
        map.load(&[[0u32, 1], [2, 0]], 200.0, 100.0).unwrap();
        assert_eq!(map.tile_at(Vec2::new(150.0, 10.0)).map(|t| t.id), Some(1));
        assert_eq!(map.tile_at(Vec2::new(10.0, 60.0)).map(|t| t.id), Some(2));
        assert!(map.tile_at(Vec2::new(200.0, 10.0)).is_none());
        assert!(map.tile_at(Vec2::new(-1.0, 10.0)).is_none());
        assert!(map.is_solid_at(Vec2::new(150.0, 10.0)));
        assert!(!map.is_solid_at(Vec2::new(10.0, 10.0)));
        assert!(!map.is_solid_at(Vec2::new(1000.0, 1000.0)));
    }

    #[test]
    fn test_non_finite_point_hits_no_tile() {
        let mut map = tilemap(4, 1);
        map.load(&[[1u32, 1], [1, 1]], 200.0, 100.0).unwrap();
        assert!(map.tile_at(Vec2::new(f32::NAN, 10.0)).is_none());
        assert!(map.tile_at(Vec2::new(10.0, f32::INFINITY)).is_none());
        assert!(!map.is_solid_at(Vec2::NAN));
    }

    #[test]
    fn test_atlas_preview_wraps() {
        let mut map = tilemap(2, 2);
        map.load_atlas_preview(3, 2, 30.0, 20.0).unwrap();
        let ids: Vec<u32> = map.tiles().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn test_atlas_preview_of_very_wide_atlas() {
        let mut map = tilemap(u32::MAX, 1);
        map.load_atlas_preview(2, 2, 10.0, 10.0).unwrap();
        let ids: Vec<u32> = map.tiles().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
