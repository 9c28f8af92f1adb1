//! Sprite rendering pipeline.
//!
//! Submodules overview
//! - [`gpu`] – explicit GPU context trait, object ids and errors
//! - [`raylibgpu`] – production context over raylib's rlgl layer
//! - [`recording`] – driverless context used by tests and headless runs
//! - [`geometry`] – vertex array + buffers, the shared unit quad
//! - [`shader`] – built-in sprite program
//! - [`sprite`] – the sprite renderer
//! - [`texturestore`] – texture table addressed by handles
//! - [`camera`] – view matrix source
//! - [`frame`] – per-frame bundle handed to draw loops

pub mod camera;
pub mod frame;
pub mod geometry;
pub mod gpu;
pub mod raylibgpu;
pub mod recording;
pub mod shader;
pub mod sprite;
pub mod texturestore;

pub use camera::Camera2D;
pub use frame::FrameContext;
pub use gpu::{GpuContext, GpuError};
pub use sprite::{SpriteDraw, SpriteRenderer, UvRect};
pub use texturestore::{TextureHandle, TextureStore};
