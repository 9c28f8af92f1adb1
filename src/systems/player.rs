//! Player systems.
//!
//! - [`player_controller`] turns the held direction into walk/stop intent.
//! - [`player_movement`] moves walking players, refusing steps into solid tiles.
//! - [`player_animation`] advances walk cycles.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::trace;

use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::tilemap::Tilemap;

/// Keeps the far edges of a rectangle inside the tiles it actually covers.
const EDGE_INSET: f32 = 0.001;

pub fn player_controller(mut query: Query<&mut Player>, input: Res<InputState>) {
    let held = input.held_direction();
    for mut player in query.iter_mut() {
        match held {
            Some(dir) => player.walk(dir),
            None if player.moving => player.stop(),
            None => {}
        }
    }
}

pub fn player_movement(
    mut query: Query<(&Player, &mut MapPosition)>,
    time: Res<WorldTime>,
    tilemap: Option<Res<Tilemap>>,
) {
    for (player, mut position) in query.iter_mut() {
        if !player.moving {
            continue;
        }
        let target = position.pos + player.facing.vector() * player.speed * time.delta;
        if let Some(map) = tilemap.as_deref()
            && overlaps_solid(map, target, player.size)
        {
            trace!("player blocked at {:?} heading {:?}", position.pos, player.facing);
            continue;
        }
        position.pos = target;
    }
}

pub fn player_animation(mut query: Query<&mut Player>, time: Res<WorldTime>) {
    for mut player in query.iter_mut() {
        player.advance_animation(time.delta);
    }
}

/// Whether the rectangle at `pos` sized `size` covers any solid tile.
///
/// Every grid cell under the rectangle is checked, so a rectangle wider or
/// taller than a tile cannot straddle a wall. Cells off the map are not solid.
pub fn overlaps_solid(map: &Tilemap, pos: Vec2, size: Vec2) -> bool {
    let (rows, columns) = map.grid_shape();
    let tile = map.tile_size();
    if rows == 0 || columns == 0 || !pos.is_finite() || !size.is_finite() {
        return false;
    }
    let far = pos + (size - Vec2::splat(EDGE_INSET)).max(Vec2::ZERO);
    let first = (pos / tile).floor().max(Vec2::ZERO);
    let last = (far / tile)
        .floor()
        .min(Vec2::new(columns as f32 - 1.0, rows as f32 - 1.0));
    if first.x > last.x || first.y > last.y {
        return false;
    }
    (first.y as usize..=last.y as usize).any(|row| {
        (first.x as usize..=last.x as usize).any(|column| {
            map.tiles()
                .get(row * columns + column)
                .is_some_and(|t| t.solid)
        })
    })
}
