//! Render pass.
//!
//! Draws the world in painter's order: background, tiles, entity sprites
//! sorted by [`ZIndex`], then players through the tilemap's player layer.
//! Query results are collected first, then drawn through a
//! [`FrameContext`] borrowing the renderer, texture table and camera.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{trace, warn};

use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::render::camera::Camera2D;
use crate::render::frame::FrameContext;
use crate::render::gpu::GpuContext;
use crate::render::sprite::{SpriteDraw, SpriteRenderer};
use crate::render::texturestore::TextureStore;
use crate::resources::screensize::ScreenSize;
use crate::tilemap::Tilemap;

pub fn render_world<G: GpuContext>(world: &mut World, gpu: &mut G) {
    let mut to_draw: Vec<(ZIndex, SpriteDraw, Sprite)> = {
        let mut q =
            world.query_filtered::<(&Sprite, &MapPosition, Option<&ZIndex>), Without<Player>>();
        q.iter(world)
            .map(|(s, p, z)| {
                let draw = SpriteDraw::new(p.pos, s.size)
                    .rotation(s.rotation)
                    .color(s.color)
                    .uv(s.uv)
                    .mirror(s.mirror);
                (z.copied().unwrap_or_default(), draw, *s)
            })
            .collect()
    };
    to_draw.sort_by_key(|(z, _, _)| *z);

    let players: Vec<(Vec2, Vec2, u32)> = {
        let mut q = world.query::<(&Player, &MapPosition)>();
        q.iter(world)
            .map(|(player, p)| (p.pos, player.size, player.tile()))
            .collect()
    };

    let world: &World = world;
    let Some(renderer) = world.get_resource::<SpriteRenderer>() else {
        warn!("render_world called without a SpriteRenderer resource");
        return;
    };
    let Some(textures) = world.get_resource::<TextureStore>() else {
        warn!("render_world called without a TextureStore resource");
        return;
    };
    let Some(screen) = world.get_resource::<ScreenSize>().map(ScreenSize::as_vec2) else {
        warn!("render_world called without a ScreenSize resource");
        return;
    };
    let view = world
        .get_resource::<Camera2D>()
        .copied()
        .unwrap_or_default()
        .view_matrix();
    let tilemap = world.get_resource::<Tilemap>();

    renderer
        .shader()
        .set_screen_projection(gpu, screen.x, screen.y);
    let mut frame = FrameContext::new(gpu, renderer, textures, view);

    if let Some(map) = tilemap {
        if map.background().is_some() {
            map.draw_background(&mut frame, screen.x, screen.y);
        }
        map.draw(&mut frame);
    }

    for (_, draw, sprite) in &to_draw {
        frame.sprite(sprite.texture, draw);
    }

    match tilemap {
        Some(map) => {
            for (pos, size, tile) in &players {
                map.draw_player_layer(&mut frame, *pos, *size, *tile);
            }
        }
        None if !players.is_empty() => {
            warn!("players need a tilemap atlas to draw, {} skipped", players.len());
        }
        None => {}
    }

    trace!(
        "frame: {} sprites, {} players",
        to_draw.len(),
        players.len()
    );
}
