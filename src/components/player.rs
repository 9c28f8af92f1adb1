//! Player character state.
//!
//! The player is drawn from the level's tile atlas through the tilemap's
//! player layer. Each facing direction has a three-frame walk cycle; the middle
//! frame doubles as the standing pose.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Seconds each walk frame stays on screen.
pub const FRAME_DURATION: f32 = 0.1;

/// Index into a walk cycle used while standing still.
pub const STANDING_FRAME: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Atlas tile indices of the walk cycle for this direction.
    pub fn frames(self) -> [u32; 3] {
        match self {
            Direction::Up => [13, 14, 15],
            Direction::Down => [1, 2, 3],
            Direction::Left => [7, 8, 9],
            Direction::Right => [19, 20, 21],
        }
    }

    /// Unit step in world space (y grows downwards).
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Player {
    pub facing: Direction,
    pub moving: bool,
    /// World units per second.
    pub speed: f32,
    pub size: Vec2,
    anim_timer: f32,
    frame: usize,
}

impl Player {
    pub fn new(speed: f32, size: Vec2) -> Self {
        Self {
            facing: Direction::Down,
            moving: false,
            speed,
            size,
            anim_timer: 0.0,
            frame: STANDING_FRAME,
        }
    }

    /// Start (or keep) walking towards `dir`.
    pub fn walk(&mut self, dir: Direction) {
        if self.facing != dir {
            self.facing = dir;
            self.anim_timer = 0.0;
        }
        self.moving = true;
    }

    /// Stop walking and fall back to the standing pose.
    pub fn stop(&mut self) {
        self.moving = false;
        self.anim_timer = 0.0;
        self.frame = STANDING_FRAME;
    }

    /// Advance the walk cycle by `dt` seconds. Does nothing while standing.
    pub fn advance_animation(&mut self, dt: f32) {
        if !self.moving {
            return;
        }
        self.anim_timer += dt;
        while self.anim_timer >= FRAME_DURATION {
            self.anim_timer -= FRAME_DURATION;
            self.frame = (self.frame + 1) % 3;
        }
    }

    /// Position in the current walk cycle, `0..3`.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Atlas tile index to draw this frame.
    pub fn tile(&self) -> u32 {
        self.facing.frames()[self.frame]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_stands_facing_down() {
        let p = Player::new(100.0, Vec2::splat(32.0));
        assert!(!p.moving);
        assert_eq!(p.tile(), 2);
    }

    #[test]
    fn test_frames_advance_every_tenth_of_a_second() {
        let mut p = Player::new(100.0, Vec2::splat(32.0));
        p.walk(Direction::Right);
        assert_eq!(p.tile(), 20);
        p.advance_animation(0.05);
        assert_eq!(p.tile(), 20);
        p.advance_animation(0.06);
        assert_eq!(p.tile(), 21);
        p.advance_animation(0.1);
        assert_eq!(p.tile(), 19);
        p.advance_animation(0.25);
        assert_eq!(p.frame(), 2);
    }

    #[test]
    fn test_stop_resets_to_standing_frame() {
        let mut p = Player::new(100.0, Vec2::splat(32.0));
        p.walk(Direction::Up);
        p.advance_animation(0.15);
        assert_eq!(p.tile(), 15);
        p.stop();
        assert_eq!(p.tile(), 14);
        p.advance_animation(1.0);
        assert_eq!(p.tile(), 14);
    }

    #[test]
    fn test_frame_tables() {
        assert_eq!(Direction::Up.frames(), [13, 14, 15]);
        assert_eq!(Direction::Down.frames(), [1, 2, 3]);
        assert_eq!(Direction::Left.frames(), [7, 8, 9]);
        assert_eq!(Direction::Right.frames(), [19, 20, 21]);
    }
}
