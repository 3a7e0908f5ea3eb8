use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// The controller buttons the demo reacts to. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Z,
}

/// Map one keyboard event to a button press edge.
///
/// Only the transition into the pressed state counts: releases and the
/// repeat events winit delivers while a key is held produce `None`, as do
/// keys outside the A/B/Z mapping.
pub fn classify(state: ElementState, repeat: bool, key: PhysicalKey) -> Option<Button> {
    if state != ElementState::Pressed || repeat {
        return None;
    }
    match key {
        PhysicalKey::Code(KeyCode::KeyA) => Some(Button::A),
        PhysicalKey::Code(KeyCode::KeyB) => Some(Button::B),
        PhysicalKey::Code(KeyCode::KeyZ) => Some(Button::Z),
        _ => None,
    }
}

/// Collects edge-triggered button presses between frames.
#[derive(Debug, Default)]
pub struct InputCollector {
    pressed: Vec<Button>,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one winit keyboard event.
    pub fn record_key(&mut self, event: &KeyEvent) {
        if let Some(button) = classify(event.state, event.repeat, event.physical_key) {
            self.press(button);
        }
    }

    /// Register a press edge directly.
    pub fn press(&mut self, button: Button) {
        self.pressed.push(button);
    }

    /// Take the presses recorded since the last drain, in arrival order.
    pub fn drain(&mut self) -> Vec<Button> {
        std::mem::take(&mut self.pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_edges_map_to_their_buttons() {
        for (key, button) in [
            (KeyCode::KeyA, Button::A),
            (KeyCode::KeyB, Button::B),
            (KeyCode::KeyZ, Button::Z),
        ] {
            assert_eq!(
                classify(ElementState::Pressed, false, PhysicalKey::Code(key)),
                Some(button)
            );
        }
    }

    #[test]
    fn held_key_repeats_are_suppressed() {
        assert_eq!(
            classify(
                ElementState::Pressed,
                true,
                PhysicalKey::Code(KeyCode::KeyA)
            ),
            None
        );
    }

    #[test]
    fn releases_are_suppressed() {
        assert_eq!(
            classify(
                ElementState::Released,
                false,
                PhysicalKey::Code(KeyCode::KeyB)
            ),
            None
        );
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        for key in [KeyCode::KeyC, KeyCode::Space, KeyCode::Enter] {
            assert_eq!(
                classify(ElementState::Pressed, false, PhysicalKey::Code(key)),
                None
            );
        }
    }

    #[test]
    fn drain_returns_presses_in_order_and_clears() {
        let mut input = InputCollector::new();
        input.press(Button::A);
        input.press(Button::Z);
        input.press(Button::B);
        assert_eq!(input.drain(), vec![Button::A, Button::Z, Button::B]);
        assert!(input.drain().is_empty());
    }
}
