//! ECS components for entities.
//!
//! Submodules overview:
//! - [`ball`] – bouncing ball radius and edge rules
//! - [`mapposition`] – world-space position of an entity
//! - [`player`] – facing, walk state and animation frames of the player
//! - [`rigidbody`] – simple kinematic body storing velocity
//! - [`sprite`] – textured quad drawn by the render pass
//! - [`zindex`] – rendering order hint for 2D drawing

pub mod ball;
pub mod mapposition;
pub mod player;
pub mod rigidbody;
pub mod sprite;
pub mod zindex;
