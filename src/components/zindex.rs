//! Z-index component for render ordering.
//!
//! There is no depth buffer; entities with higher values are simply drawn
//! later and so end up on top.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
