//! Texture table.
//!
//! Textures are loaded once per key (normally the file path) and referred to
//! everywhere else by a [`TextureHandle`], an index into this table. The store
//! is the single owner; tilemaps, backgrounds and sprites only copy handles.

use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;

use super::gpu::{GpuContext, GpuError, GpuTexture};

/// Index of a texture inside a [`TextureStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Resource, Debug, Default)]
pub struct TextureStore {
    entries: Vec<GpuTexture>,
    by_key: FxHashMap<String, TextureHandle>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the texture at `path`, or return the handle it already has.
    pub fn load(
        &mut self,
        gpu: &mut impl GpuContext,
        path: impl AsRef<Path>,
    ) -> Result<TextureHandle, GpuError> {
        let path = path.as_ref();
        let key = path.to_string_lossy().into_owned();
        if let Some(handle) = self.by_key.get(&key) {
            return Ok(*handle);
        }
        let texture = gpu.load_texture(path)?;
        info!(
            "Loaded texture '{}' ({}x{})",
            key, texture.width, texture.height
        );
        Ok(self.insert(key, texture))
    }

    /// Register an already uploaded texture under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, texture: GpuTexture) -> TextureHandle {
        let key = key.into();
        if let Some(handle) = self.by_key.get(&key) {
            self.entries[handle.index()] = texture;
            return *handle;
        }
        let handle = TextureHandle(self.entries.len() as u32);
        self.entries.push(texture);
        self.by_key.insert(key, handle);
        handle
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.entries.get(handle.index())
    }

    pub fn handle(&self, key: &str) -> Option<TextureHandle> {
        self.by_key.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::gpu::TextureId;
    use crate::render::recording::RecordingGpu;

    #[test]
    fn test_same_path_same_handle() {
        let mut gpu = RecordingGpu::new();
        let mut store = TextureStore::new();
        let a = store.load(&mut gpu, "assets/atlas.png").unwrap();
        let b = store.load(&mut gpu, "assets/atlas.png").unwrap();
        let c = store.load(&mut gpu, "assets/bg.png").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_replaces_texture_under_key() {
        let mut store = TextureStore::new();
        let tex = |id| GpuTexture {
            id: TextureId(id),
            width: 8,
            height: 8,
        };
        let a = store.insert("atlas", tex(1));
        let b = store.insert("atlas", tex(2));
        assert_eq!(a, b);
        assert_eq!(store.get(a).map(|t| t.id), Some(TextureId(2)));
        assert_eq!(store.handle("atlas"), Some(a));
    }

    #[test]
    fn test_load_error_propagates() {
        let mut gpu = RecordingGpu::without_context();
        let mut store = TextureStore::new();
        assert!(store.load(&mut gpu, "x.png").is_err());
        assert!(store.is_empty());
    }
}
