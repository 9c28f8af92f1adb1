//! ECS resources made available to systems.
//!
//! The renderer, texture table, camera and tilemap are resources too; they
//! live with the code that owns them in [`crate::render`] and
//! [`crate::tilemap`].
//!
//! Overview
//! - `gameconfig` – settings loaded from `config.ini`
//! - `input` – per-frame keyboard state of keys relevant to the game
//! - `screensize` – current framebuffer dimensions in pixels
//! - `worldtime` – simulation time and delta
pub mod gameconfig;
pub mod input;
pub mod screensize;
pub mod worldtime;
