//! Per-frame keyboard input resource.
//!
//! Captures the keys the sandbox cares about. WASD and the arrow keys both
//! steer the player; Space relaunches the ball; Escape quits.
use bevy_ecs::prelude::*;
use raylib::prelude::KeyboardKey;

use crate::components::player::Direction;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently held.
    pub active: bool,
    /// Whether the key went down this frame.
    pub just_pressed: bool,

    pub key_binding: KeyboardKey,
}

impl BoolState {
    pub fn bound_to(key_binding: KeyboardKey) -> Self {
        Self {
            key_binding,
            ..Self::default()
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self {
            active: false,
            just_pressed: false,
            key_binding: KeyboardKey::KEY_NULL,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub maindirection_up: BoolState,
    pub maindirection_left: BoolState,
    pub maindirection_down: BoolState,
    pub maindirection_right: BoolState,
    // Arrow keys
    pub secondarydirection_up: BoolState,
    pub secondarydirection_down: BoolState,
    pub secondarydirection_left: BoolState,
    pub secondarydirection_right: BoolState,
    pub action_back: BoolState,
    pub action_1: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            maindirection_up: BoolState::bound_to(KeyboardKey::KEY_W),
            maindirection_left: BoolState::bound_to(KeyboardKey::KEY_A),
            maindirection_down: BoolState::bound_to(KeyboardKey::KEY_S),
            maindirection_right: BoolState::bound_to(KeyboardKey::KEY_D),
            secondarydirection_up: BoolState::bound_to(KeyboardKey::KEY_UP),
            secondarydirection_down: BoolState::bound_to(KeyboardKey::KEY_DOWN),
            secondarydirection_left: BoolState::bound_to(KeyboardKey::KEY_LEFT),
            secondarydirection_right: BoolState::bound_to(KeyboardKey::KEY_RIGHT),
            action_back: BoolState::bound_to(KeyboardKey::KEY_ESCAPE),
            action_1: BoolState::bound_to(KeyboardKey::KEY_SPACE),
        }
    }
}

impl InputState {
    /// Every key slot, for capture loops.
    pub fn slots_mut(&mut self) -> [&mut BoolState; 10] {
        [
            &mut self.maindirection_up,
            &mut self.maindirection_left,
            &mut self.maindirection_down,
            &mut self.maindirection_right,
            &mut self.secondarydirection_up,
            &mut self.secondarydirection_down,
            &mut self.secondarydirection_left,
            &mut self.secondarydirection_right,
            &mut self.action_back,
            &mut self.action_1,
        ]
    }

    /// The direction currently held, WASD or arrows.
    ///
    /// When several are held the first of up, down, left, right wins.
    pub fn held_direction(&self) -> Option<Direction> {
        if self.maindirection_up.active || self.secondarydirection_up.active {
            Some(Direction::Up)
        } else if self.maindirection_down.active || self.secondarydirection_down.active {
            Some(Direction::Down)
        } else if self.maindirection_left.active || self.secondarydirection_left.active {
            Some(Direction::Left)
        } else if self.maindirection_right.active || self.secondarydirection_right.active {
            Some(Direction::Right)
        } else {
            None
        }
    }
}
