//! Bouncing ball.
//!
//! Position lives in [`MapPosition`] and velocity in [`RigidBody`]; this
//! component adds the radius, the bounce rules and where the ball is put back
//! after a reset. The ball bounces off the left, right and top edges of the
//! window. The bottom edge is open.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use super::mapposition::MapPosition;
use super::rigidbody::RigidBody;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub radius: f32,
    pub launch_position: Vec2,
    pub launch_velocity: Vec2,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            launch_position: Vec2::ZERO,
            launch_velocity: Vec2::ZERO,
        }
    }

    pub fn with_launch(mut self, position: Vec2, velocity: Vec2) -> Self {
        self.launch_position = position;
        self.launch_velocity = velocity;
        self
    }

    /// Width and height of the ball's bounding square.
    pub fn diameter(&self) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }

    /// Integrate one step and reflect off the side and top edges.
    ///
    /// Returns the new position.
    pub fn step(
        &self,
        position: &mut MapPosition,
        body: &mut RigidBody,
        dt: f32,
        window_width: f32,
    ) -> Vec2 {
        let pos = &mut position.pos;
        let vel = &mut body.velocity;
        *pos += *vel * dt;

        if pos.x <= 0.0 {
            vel.x = -vel.x;
            pos.x = 0.0;
        } else if pos.x + self.diameter().x >= window_width {
            vel.x = -vel.x;
            pos.x = window_width - self.diameter().x;
        }
        if pos.y <= 0.0 {
            vel.y = -vel.y;
            pos.y = 0.0;
        }
        *pos
    }

    /// Put the ball back at `pos` travelling at `velocity`.
    pub fn reset(position: &mut MapPosition, body: &mut RigidBody, pos: Vec2, velocity: Vec2) {
        position.pos = pos;
        body.velocity = velocity;
    }

    /// Whether the ball has fallen past the open bottom edge.
    pub fn is_lost(&self, position: &MapPosition, window_height: f32) -> bool {
        position.pos.y > window_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> (Ball, MapPosition, RigidBody) {
        (
            Ball::new(10.0),
            MapPosition::new(x, y),
            RigidBody::new(Vec2::new(vx, vy)),
        )
    }

    #[test]
    fn test_free_flight() {
        let (ball, mut pos, mut body) = ball_at(100.0, 100.0, 50.0, -20.0);
        let p = ball.step(&mut pos, &mut body, 0.5, 800.0);
        assert_eq!(p, Vec2::new(125.0, 90.0));
        assert_eq!(body.velocity, Vec2::new(50.0, -20.0));
    }

    #[test]
    fn test_bounces_off_left_edge() {
        let (ball, mut pos, mut body) = ball_at(5.0, 100.0, -100.0, 0.0);
        ball.step(&mut pos, &mut body, 0.1, 800.0);
        assert_eq!(pos.pos.x, 0.0);
        assert_eq!(body.velocity.x, 100.0);
    }

    #[test]
    fn test_bounces_off_right_edge() {
        let (ball, mut pos, mut body) = ball_at(775.0, 100.0, 100.0, 0.0);
        ball.step(&mut pos, &mut body, 0.1, 800.0);
        assert_eq!(pos.pos.x, 780.0);
        assert_eq!(body.velocity.x, -100.0);
    }

    #[test]
    fn test_bounces_off_top_but_not_bottom() {
        let (ball, mut pos, mut body) = ball_at(100.0, 2.0, 0.0, -50.0);
        ball.step(&mut pos, &mut body, 0.1, 800.0);
        assert_eq!(pos.pos.y, 0.0);
        assert_eq!(body.velocity.y, 50.0);

        let (ball, mut pos, mut body) = ball_at(100.0, 5000.0, 0.0, 50.0);
        ball.step(&mut pos, &mut body, 1.0, 800.0);
        assert_eq!(pos.pos.y, 5050.0);
        assert_eq!(body.velocity.y, 50.0);
    }

    #[test]
    fn test_lost_below_window() {
        let (ball, pos, _) = ball_at(10.0, 601.0, 0.0, 0.0);
        assert!(ball.is_lost(&pos, 600.0));
        assert!(!ball.is_lost(&MapPosition::new(10.0, 590.0), 600.0));
    }

    #[test]
    fn test_reset() {
        let (_, mut pos, mut body) = ball_at(1.0, 2.0, 3.0, 4.0);
        Ball::reset(&mut pos, &mut body, Vec2::new(10.0, 20.0), Vec2::new(-1.0, -2.0));
        assert_eq!(pos.pos, Vec2::new(10.0, 20.0));
        assert_eq!(body.velocity, Vec2::new(-1.0, -2.0));
    }
}
