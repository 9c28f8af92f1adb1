use bevy_ecs::prelude::Resource;

/// Simulation clock, advanced once per frame by
/// [`update_world_time`](crate::systems::time::update_world_time).
///
/// `delta` is already scaled by `time_scale`; systems multiply velocities by
/// it directly.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Count one frame lasting `dt` unscaled seconds.
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt * self.time_scale;
        self.elapsed += self.delta;
        self.frame_count += 1;
    }
}
