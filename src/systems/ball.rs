//! Ball movement system.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::ball::Ball;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::input::InputState;
use crate::resources::screensize::ScreenSize;
use crate::resources::worldtime::WorldTime;

/// Move every ball, bouncing off the window edges.
///
/// A ball that drops out of the bottom of the window, or any ball when the
/// relaunch key goes down, is reset to its launch position and velocity.
pub fn ball_movement(
    mut query: Query<(&Ball, &mut MapPosition, &mut RigidBody)>,
    time: Res<WorldTime>,
    screen: Res<ScreenSize>,
    input: Res<InputState>,
) {
    let size = screen.as_vec2();
    for (ball, mut position, mut body) in query.iter_mut() {
        if input.action_1.just_pressed || ball.is_lost(&position, size.y) {
            debug!("ball relaunched from {:?}", ball.launch_position);
            Ball::reset(
                &mut position,
                &mut body,
                ball.launch_position,
                ball.launch_velocity,
            );
            continue;
        }
        ball.step(&mut position, &mut body, time.delta, size.x);
    }
}
