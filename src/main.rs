//! Tile Sprite sandbox entry point.
//!
//! A small 2D rendering sandbox using:
//! - **raylib** (rlgl) for the window and the graphics context
//! - **bevy_ecs** for entities, resources and the update schedule
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults if missing), apply CLI overrides
//! 2. Open the window and create the GPU context
//! 3. Load the level, textures, spawn the player and the ball
//! 4. Each frame: capture keyboard, advance time, run the update schedule and
//!    render background, tiles, sprites and players
//! 5. Release the renderer's GPU objects on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release
//! cargo run -- --headless 120
//! cargo run -- --triangle-test
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{debug, error, info, warn};
use raylib::prelude::*;

use tilesprite::game::{self, SetupError};
use tilesprite::harness;
use tilesprite::render::raylibgpu::RaylibGpu;
use tilesprite::render::recording::RecordingGpu;
use tilesprite::resources::gameconfig::GameConfig;
use tilesprite::resources::input::InputState;
use tilesprite::resources::screensize::ScreenSize;
use tilesprite::systems::input::capture_keyboard;

/// Fixed step used by the headless runner.
const HEADLESS_DT: f32 = 1.0 / 60.0;

/// Tile and sprite rendering sandbox
#[derive(Parser)]
#[command(version, about = "Tile and sprite rendering sandbox")]
struct Cli {
    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Level description to load instead of the configured one.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,

    /// Run this many frames without a window and exit.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,

    /// Open the indexed-rectangle test window instead of the game.
    #[arg(long)]
    triangle_test: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}, using defaults", e);
    }
    if let Some(level) = cli.level {
        config.level_path = level;
    }

    if cli.triangle_test {
        if let Err(e) = harness::run_triangle_test(&config) {
            error!("Triangle test failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let result = match cli.headless {
        Some(frames) => run_headless(&config, frames),
        None => run_window(&config),
    };
    if let Err(e) = result {
        error!("Startup failed: {}", e);
        std::process::exit(1);
    }
}

fn run_window(config: &GameConfig) -> Result<(), SetupError> {
    let (width, height) = config.window_size();
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title(&config.title)
        .build();
    rl.set_target_fps(config.target_fps);
    // Escape is read through `InputState::action_back` instead.
    rl.set_exit_key(None);

    // Declared after `rl` so its GPU objects are released while the context lives.
    let mut gpu = RaylibGpu::new();
    let mut world = World::new();
    game::setup(&mut world, &mut gpu, config)?;
    let mut schedule = game::update_schedule();

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        capture_keyboard(&rl, &mut world.resource_mut::<InputState>());
        if game::quit_requested(&world) {
            info!("Escape pressed, quitting");
            break;
        }
        *world.resource_mut::<ScreenSize>() = ScreenSize {
            w: rl.get_screen_width(),
            h: rl.get_screen_height(),
        };

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        gpu.flush_batch();
        game::run_frame(&mut world, &mut schedule, &mut gpu, dt);
    }

    game::teardown(&mut world, &mut gpu);
    Ok(())
}

fn run_headless(config: &GameConfig, frames: u32) -> Result<(), SetupError> {
    let mut gpu = RecordingGpu::new();
    let mut world = World::new();
    game::setup(&mut world, &mut gpu, config)?;
    let mut schedule = game::update_schedule();

    let mut total_draws = 0;
    for frame in 0..frames {
        gpu.clear_log();
        game::run_frame(&mut world, &mut schedule, &mut gpu, HEADLESS_DT);
        debug!("frame {}: {} draws", frame, gpu.draws().len());
        total_draws += gpu.draws().len();
    }

    game::teardown(&mut world, &mut gpu);
    info!(
        "Headless run finished: {} frames, {} draws",
        frames, total_draws
    );
    Ok(())
}
