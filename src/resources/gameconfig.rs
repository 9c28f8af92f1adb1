//! Game configuration resource.
//!
//! Settings loaded from an INI configuration file. Defaults allow a safe
//! startup when the file is missing or only partially filled in.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 600
//! target_fps = 60
//! title = Tile Sprite Sandbox
//!
//! [level]
//! path = ./assets/levels/level01.json
//!
//! [player]
//! speed = 120
//! width = 32
//! height = 32
//!
//! [ball]
//! radius = 12.5
//! velocity_x = 100
//! velocity_y = -350
//! texture = ./assets/textures/ball.png
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::{info, warn};
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_TITLE: &str = "Tile Sprite Sandbox";
const DEFAULT_LEVEL_PATH: &str = "./assets/levels/level01.json";
const DEFAULT_PLAYER_SPEED: f32 = 120.0;
const DEFAULT_PLAYER_SIZE: f32 = 32.0;
const DEFAULT_BALL_RADIUS: f32 = 12.5;
const DEFAULT_BALL_VELOCITY: (f32, f32) = (100.0, -350.0);
const DEFAULT_BALL_TEXTURE: &str = "./assets/textures/ball.png";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub title: String,
    /// JSON level description to load at startup.
    pub level_path: PathBuf,
    /// World units per second.
    pub player_speed: f32,
    pub player_size: Vec2,
    pub ball_radius: f32,
    pub ball_velocity: Vec2,
    pub ball_texture: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            title: DEFAULT_TITLE.to_string(),
            level_path: PathBuf::from(DEFAULT_LEVEL_PATH),
            player_speed: DEFAULT_PLAYER_SPEED,
            player_size: Vec2::splat(DEFAULT_PLAYER_SIZE),
            ball_radius: DEFAULT_BALL_RADIUS,
            ball_velocity: Vec2::new(DEFAULT_BALL_VELOCITY.0, DEFAULT_BALL_VELOCITY.1),
            ball_texture: PathBuf::from(DEFAULT_BALL_TEXTURE),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} window, fps={}, level={:?}",
            self.window_width, self.window_height, self.target_fps, self.level_path
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| config.getfloat(section, key).ok().flatten();

        // [window] section
        if let Some(width) = window_dimension(config, "width") {
            self.window_width = width;
        }
        if let Some(height) = window_dimension(config, "height") {
            self.window_height = height;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            match u32::try_from(fps) {
                Ok(fps) => self.target_fps = fps,
                Err(_) => warn!(
                    "[window] target_fps = {} out of range, keeping {}",
                    fps, self.target_fps
                ),
            }
        }
        if let Some(title) = config.get("window", "title") {
            self.title = title;
        }

        // [level] section
        if let Some(path) = config.get("level", "path") {
            self.level_path = PathBuf::from(path);
        }

        // [player] section
        if let Some(speed) = float("player", "speed") {
            self.player_speed = speed as f32;
        }
        if let Some(width) = float("player", "width") {
            self.player_size.x = width as f32;
        }
        if let Some(height) = float("player", "height") {
            self.player_size.y = height as f32;
        }

        // [ball] section
        if let Some(radius) = float("ball", "radius") {
            self.ball_radius = radius as f32;
        }
        if let Some(vx) = float("ball", "velocity_x") {
            self.ball_velocity.x = vx as f32;
        }
        if let Some(vy) = float("ball", "velocity_y") {
            self.ball_velocity.y = vy as f32;
        }
        if let Some(texture) = config.get("ball", "texture") {
            self.ball_texture = PathBuf::from(texture);
        }
    }

    /// Window size in the signed pixels raylib expects.
    ///
    /// A value set directly on the struct that does not fit falls back to the default.
    pub fn window_size(&self) -> (i32, i32) {
        let fit = |v: u32, default: u32| i32::try_from(v).unwrap_or(default as i32);
        (
            fit(self.window_width, DEFAULT_WINDOW_WIDTH),
            fit(self.window_height, DEFAULT_WINDOW_HEIGHT),
        )
    }
}

/// A `[window]` dimension that is positive and fits a raylib `i32`.
fn window_dimension(config: &Ini, key: &str) -> Option<u32> {
    let value = config.getuint("window", key).ok().flatten()?;
    match i32::try_from(value) {
        Ok(v) if v > 0 => u32::try_from(v).ok(),
        _ => {
            warn!("[window] {} = {} out of range, keeping default", key, value);
            None
        }
    }
}
