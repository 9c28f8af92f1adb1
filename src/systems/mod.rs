//! Game systems.
//!
//! Submodules overview
//! - [`ball`] – move balls, bounce them off the window edges, relaunch lost ones
//! - [`input`] – copy keyboard state from Raylib into [`crate::resources::input::InputState`]
//! - [`player`] – walk intent, tile-blocked movement and walk-cycle animation
//! - [`render`] – draw background, tiles, sprites and players in order
//! - [`time`] – update simulation time and delta

pub mod ball;
pub mod input;
pub mod player;
pub mod render;
pub mod time;
