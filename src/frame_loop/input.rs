use std::collections::HashMap;

use winit::keyboard::PhysicalKey;

/// Held state of every key seen so far, keyed by DOM-style code
/// (`"ArrowUp"`, `"KeyW"`, ...). Keys never reported read as released.
#[derive(Debug, Default)]
pub struct InputState {
    keys: HashMap<String, bool>,
}

impl InputState {
    pub fn set_key_state(&mut self, key_id: &str, held: bool) {
        match self.keys.get_mut(key_id) {
            Some(state) => *state = held,
            None => {
                self.keys.insert(key_id.to_owned(), held);
            }
        }
    }

    pub fn release_all(&mut self) {
        self.keys.values_mut().for_each(|held| *held = false);
    }

    pub fn is_held(&self, key_id: &str) -> bool {
        self.keys.get(key_id).copied().unwrap_or(false)
    }
}

/// Maps a winit physical key to the identifier used by [`InputState`].
///
/// winit's `KeyCode` variants share their names with the W3C
/// `KeyboardEvent.code` values, so the debug name is the identifier.
pub fn key_id(key: PhysicalKey) -> Option<String> {
    match key {
        PhysicalKey::Code(code) => Some(format!("{code:?}")),
        PhysicalKey::Unidentified(_) => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Forward,
        Action::Backward,
        Action::TurnLeft,
        Action::TurnRight,
    ];
}

/// Each action is bound to an arrow key and a WASD key.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: [(Action, [&'static str; 2]); 4],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: [
                (Action::Forward, ["ArrowUp", "KeyW"]),
                (Action::Backward, ["ArrowDown", "KeyS"]),
                (Action::TurnLeft, ["ArrowLeft", "KeyA"]),
                (Action::TurnRight, ["ArrowRight", "KeyD"]),
            ],
        }
    }
}

impl KeyBindings {
    pub fn keys(&self, action: Action) -> &[&'static str; 2] {
        self.bindings
            .iter()
            .find_map(|(a, keys)| if *a == action { Some(keys) } else { None })
            .unwrap_or(&["", ""])
    }

    pub fn is_active(&self, action: Action, input: &InputState) -> bool {
        self.keys(action).iter().any(|key| input.is_held(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{KeyCode, NativeKeyCode};

    #[test]
    fn unknown_keys_are_released() {
        let input = InputState::default();
        assert!(!input.is_held("ArrowUp"));
        assert!(!input.is_held(""));
    }

    #[test]
    fn press_then_release() {
        let mut input = InputState::default();
        input.set_key_state("KeyW", true);
        assert!(input.is_held("KeyW"));
        input.set_key_state("KeyW", false);
        assert!(!input.is_held("KeyW"));
        assert!(!input.is_held("KeyS"));
    }

    #[test]
    fn release_all_clears_held_keys() {
        let bindings = KeyBindings::default();
        let mut input = InputState::default();
        input.set_key_state("KeyW", true);
        input.set_key_state("ArrowLeft", true);
        input.release_all();
        assert!(!input.is_held("KeyW"));
        assert!(!bindings.is_active(Action::TurnLeft, &input));

        input.set_key_state("KeyW", true);
        assert!(input.is_held("KeyW"));
    }

    #[test]
    fn key_ids_use_dom_codes() {
        assert_eq!(key_id(PhysicalKey::Code(KeyCode::ArrowUp)).as_deref(), Some("ArrowUp"));
        assert_eq!(key_id(PhysicalKey::Code(KeyCode::KeyW)).as_deref(), Some("KeyW"));
        assert_eq!(key_id(PhysicalKey::Code(KeyCode::Minus)).as_deref(), Some("Minus"));
        assert_eq!(
            key_id(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            None
        );
    }

    #[test]
    fn either_bound_key_activates_an_action() {
        let bindings = KeyBindings::default();
        let mut input = InputState::default();
        assert!(!bindings.is_active(Action::Forward, &input));

        input.set_key_state("KeyW", true);
        assert!(bindings.is_active(Action::Forward, &input));
        input.set_key_state("KeyW", false);
        input.set_key_state("ArrowUp", true);
        assert!(bindings.is_active(Action::Forward, &input));
        assert!(!bindings.is_active(Action::Backward, &input));
    }

    #[test]
    fn every_action_has_an_arrow_and_a_letter() {
        let bindings = KeyBindings::default();
        for action in Action::ALL {
            let [arrow, letter] = bindings.keys(action);
            assert!(arrow.starts_with("Arrow"));
            assert!(letter.starts_with("Key"));
        }
    }
}
