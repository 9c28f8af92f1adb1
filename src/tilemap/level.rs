//! JSON level descriptions.
//!
//! ```json
//! {
//!   "atlas": "./assets/textures/tiles.png",
//!   "tiles_across": 6,
//!   "tiles_down": 4,
//!   "background": "./assets/textures/background.png",
//!   "width": 800,
//!   "height": 600,
//!   "non_solid": [0],
//!   "grid": [[1, 1, 1], [0, 0, 0]]
//! }
//! ```

use std::path::Path;

use log::info;
use serde::Deserialize;

use super::{Atlas, Solidity, Tilemap, TilemapError};
use crate::render::gpu::GpuContext;
use crate::render::texturestore::TextureStore;

fn default_non_solid() -> Vec<u32> {
    vec![0]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelDescription {
    pub atlas: String,
    pub tiles_across: u32,
    pub tiles_down: u32,
    #[serde(default)]
    pub background: Option<String>,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_non_solid")]
    pub non_solid: Vec<u32>,
    pub grid: Vec<Vec<u32>>,
}

impl LevelDescription {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TilemapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TilemapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::from_json(&text).map_err(|source| TilemapError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Read level {:?}: {}x{} grid, atlas '{}'",
            path,
            level.grid.first().map_or(0, Vec::len),
            level.grid.len(),
            level.atlas
        );
        Ok(level)
    }

    /// Load the atlas (and background) textures and build the tilemap.
    pub fn build(
        &self,
        gpu: &mut impl GpuContext,
        textures: &mut TextureStore,
    ) -> Result<Tilemap, TilemapError> {
        let atlas_texture = textures.load(gpu, &self.atlas)?;
        let atlas = Atlas::new(atlas_texture, self.tiles_across, self.tiles_down)?;
        let mut tilemap = Tilemap::new(atlas)
            .with_solidity(Solidity::all_except(self.non_solid.iter().copied()));
        if let Some(background) = &self.background {
            tilemap = tilemap.with_background(textures.load(gpu, background)?);
        }
        tilemap.load(&self.grid, self.width, self.height)?;
        Ok(tilemap)
    }
}
