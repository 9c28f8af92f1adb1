//! Scene setup and per-frame driver.
//!
//! [`setup`] fills a fresh [`World`] with the resources every system expects,
//! loads the level and textures and spawns the player and the ball.
//! [`run_frame`] advances one frame: time, update schedule, render pass.
//! Both are generic over the GPU context so the windowed game and the headless
//! runner share them.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;
use thiserror::Error;

use crate::components::ball::Ball;
use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::render::camera::Camera2D;
use crate::render::gpu::{GpuContext, GpuError};
use crate::render::sprite::SpriteRenderer;
use crate::render::texturestore::TextureStore;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::screensize::ScreenSize;
use crate::resources::worldtime::WorldTime;
use crate::systems::ball::ball_movement;
use crate::systems::player::{overlaps_solid, player_animation, player_controller, player_movement};
use crate::systems::render::render_world;
use crate::systems::time::update_world_time;
use crate::tilemap::{LevelDescription, Tilemap, TilemapError};

/// Z-index of the ball sprite.
const BALL_Z: i32 = 10;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Level(#[from] TilemapError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Insert resources, load the configured level and spawn the entities.
pub fn setup<G: GpuContext>(
    world: &mut World,
    gpu: &mut G,
    config: &GameConfig,
) -> Result<(), SetupError> {
    let level = LevelDescription::from_file(&config.level_path)?;
    setup_with_level(world, gpu, config, &level)
}

/// Same as [`setup`] with an already parsed level.
pub fn setup_with_level<G: GpuContext>(
    world: &mut World,
    gpu: &mut G,
    config: &GameConfig,
    level: &LevelDescription,
) -> Result<(), SetupError> {
    let (w, h) = config.window_size();
    let screen = ScreenSize { w, h };
    world.insert_resource(config.clone());
    world.insert_resource(screen);
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(Camera2D::default());

    let renderer = SpriteRenderer::with_default_quad(gpu)?;
    let mut textures = TextureStore::new();
    let tilemap = match level.build(gpu, &mut textures) {
        Ok(map) => map,
        Err(e) => {
            renderer.destroy(gpu);
            return Err(e.into());
        }
    };
    let ball_texture = match textures.load(gpu, &config.ball_texture) {
        Ok(handle) => handle,
        Err(e) => {
            renderer.destroy(gpu);
            return Err(e.into());
        }
    };

    let player_pos = player_spawn(&tilemap, config.player_size);
    world.spawn((
        Player::new(config.player_speed, config.player_size),
        MapPosition {
            pos: player_pos,
        },
    ));

    let ball = Ball::new(config.ball_radius);
    let launch = Vec2::new(
        screen.w as f32 * 0.5 - ball.radius,
        screen.h as f32 * 0.75,
    );
    let ball = ball.with_launch(launch, config.ball_velocity);
    world.spawn((
        MapPosition { pos: launch },
        RigidBody::new(config.ball_velocity),
        Sprite::new(ball_texture, ball.diameter()),
        ZIndex(BALL_Z),
        ball,
    ));

    info!(
        "Scene ready: {} tiles, {} textures, player at {:?}",
        tilemap.tiles().len(),
        textures.len(),
        player_pos
    );
    world.insert_resource(tilemap);
    world.insert_resource(textures);
    world.insert_resource(renderer);
    Ok(())
}

/// Top-left of the first tile, in row-major order, where the player fits
/// without touching a solid tile. Falls back to the origin.
pub fn player_spawn(map: &Tilemap, size: Vec2) -> Vec2 {
    map.tiles()
        .iter()
        .map(|t| t.position)
        .find(|pos| !overlaps_solid(map, *pos, size))
        .unwrap_or(Vec2::ZERO)
}

/// Whether the back action (Escape) went down this frame.
pub fn quit_requested(world: &World) -> bool {
    world
        .get_resource::<InputState>()
        .is_some_and(|input| input.action_back.just_pressed)
}

/// The per-frame update systems, in order.
pub fn update_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            player_controller,
            player_movement,
            player_animation,
            ball_movement,
        )
            .chain(),
    );
    schedule
}

/// Advance time by `dt`, run the update schedule and render the world.
pub fn run_frame<G: GpuContext>(world: &mut World, schedule: &mut Schedule, gpu: &mut G, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    render_world(world, gpu);
}

/// Release the renderer's GPU objects.
pub fn teardown<G: GpuContext>(world: &mut World, gpu: &mut G) {
    if let Some(renderer) = world.remove_resource::<SpriteRenderer>() {
        renderer.destroy(gpu);
    }
}
