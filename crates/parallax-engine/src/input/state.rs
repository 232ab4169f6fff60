use std::collections::HashSet;

use super::types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

/// Pointer motion while the primary button is held, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerDrag {
    pub dx: f32,
    pub dy: f32,
}

/// Current input state for a single window.
///
/// Holds "is down" information and the last pointer position.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,

    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an input event and reports the drag it caused, if any.
    pub fn apply_event(&mut self, ev: &InputEvent) -> Option<PointerDrag> {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // A release may never arrive once focus is gone.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                let prev = self.pointer_pos.replace((*x, *y));
                if let Some((px, py)) = prev {
                    if self.button_down(MouseButton::Left) {
                        return Some(PointerDrag {
                            dx: x - px,
                            dy: y - py,
                        });
                    }
                }
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                modifiers,
            }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
        }

        None
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn left(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn hover_is_not_a_drag() {
        let mut s = InputState::default();
        assert_eq!(s.apply_event(&moved(10.0, 10.0)), None);
        assert_eq!(s.apply_event(&moved(20.0, 15.0)), None);
    }

    #[test]
    fn move_with_left_held_reports_delta() {
        let mut s = InputState::default();
        s.apply_event(&left(MouseButtonState::Pressed, 100.0, 100.0));
        assert_eq!(
            s.apply_event(&moved(130.0, 90.0)),
            Some(PointerDrag { dx: 30.0, dy: -10.0 })
        );

        s.apply_event(&left(MouseButtonState::Released, 130.0, 90.0));
        assert_eq!(s.apply_event(&moved(140.0, 90.0)), None);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::default();
        s.apply_event(&left(MouseButtonState::Pressed, 0.0, 0.0));
        s.apply_event(&InputEvent::Key {
            key: Key::character('w'),
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });

        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.button_down(MouseButton::Left));
        assert!(!s.key_down(Key::Character('w')));
    }
}
