//! Time update system.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the `WorldTime` resource by the unscaled frame delta `dt`.
///
/// Runs outside the update schedule, before it, so every system in the frame
/// sees the same delta.
pub fn update_world_time(world: &mut World, dt: f32) {
    world.resource_mut::<WorldTime>().advance(dt);
}
