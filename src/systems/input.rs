//! Input capture.
//!
//! Raylib owns the window and is not stored in the ECS world, so keyboard
//! state is copied into [`InputState`] by the main loop before the update
//! schedule runs.
use raylib::RaylibHandle;
use raylib::ffi::KeyboardKey;

use crate::resources::input::InputState;

/// Poll Raylib for keyboard input and update `input`.
pub fn capture_keyboard(rl: &RaylibHandle, input: &mut InputState) {
    apply_key_states(
        input,
        |key| rl.is_key_down(key),
        |key| rl.is_key_pressed(key),
    );
}

/// Fill every key slot of `input` from the given key queries.
pub fn apply_key_states(
    input: &mut InputState,
    is_down: impl Fn(KeyboardKey) -> bool,
    is_pressed: impl Fn(KeyboardKey) -> bool,
) {
    for slot in input.slots_mut() {
        let key = slot.key_binding;
        slot.active = is_down(key);
        slot.just_pressed = is_pressed(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_key_states() {
        let mut input = InputState::default();
        apply_key_states(
            &mut input,
            |k| k == KeyboardKey::KEY_A || k == KeyboardKey::KEY_UP,
            |k| k == KeyboardKey::KEY_SPACE || k == KeyboardKey::KEY_ESCAPE,
        );
        assert!(input.maindirection_left.active);
        assert!(input.secondarydirection_up.active);
        assert!(!input.maindirection_right.active);
        assert!(input.action_1.just_pressed);
        assert!(input.action_back.just_pressed);

        apply_key_states(&mut input, |_| false, |_| false);
        assert!(!input.maindirection_left.active);
        assert!(!input.action_1.just_pressed);
        assert!(!input.action_back.just_pressed);
    }
}
