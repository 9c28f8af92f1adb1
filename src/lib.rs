//! Tile Sprite library.
//!
//! Sprite renderer, tilemap and the small ECS game built on them, exposed for
//! integration tests and for reuse.

pub mod components;
pub mod game;
pub mod harness;
pub mod math;
pub mod render;
pub mod resources;
pub mod systems;
pub mod tilemap;
