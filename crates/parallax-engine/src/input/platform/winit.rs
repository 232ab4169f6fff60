use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key as WinitKey, NamedKey};

use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    MouseWheelDelta, PointerButtonEvent, PointerMoveEvent,
};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Positions are divided by `scale_factor` so everything downstream sees
/// logical pixels. Events the stage has no use for yield `None`.
pub(crate) fn translate_window_event(
    scale_factor: f64,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::ModifiersChanged(m) => {
            let ms = m.state();
            InputEvent::ModifiersChanged(Modifiers {
                shift: ms.shift_key(),
                ctrl: ms.control_key(),
                alt: ms.alt_key(),
                meta: ms.super_key(),
            })
        }

        WindowEvent::Focused(f) => InputEvent::Focused(*f),
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(scale_factor, *position);
            InputEvent::PointerMoved(PointerMoveEvent { x, y })
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            // Button events carry no position; reuse the last tracked one.
            let (x, y) = state.pointer_pos.unwrap_or((0.0, 0.0));
            InputEvent::PointerButton(PointerButtonEvent {
                button: mouse_button(*button),
                state: match st {
                    ElementState::Pressed => MouseButtonState::Pressed,
                    ElementState::Released => MouseButtonState::Released,
                },
                x,
                y,
                modifiers: state.modifiers,
            })
        }

        WindowEvent::MouseWheel { delta, .. } => InputEvent::MouseWheel {
            delta: wheel_delta(scale_factor, *delta),
            modifiers: state.modifiers,
        },

        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: key(&event.logical_key),
            state: match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            },
            modifiers: state.modifiers,
            repeat: event.repeat,
        },

        _ => return None,
    };

    Some(ev)
}

fn logical(scale_factor: f64, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let l = pos.to_logical::<f64>(scale_factor);
    (l.x as f32, l.y as f32)
}

fn wheel_delta(scale_factor: f64, delta: MouseScrollDelta) -> MouseWheelDelta {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x, y },
        MouseScrollDelta::PixelDelta(p) => {
            let (x, y) = logical(scale_factor, p);
            MouseWheelDelta::Pixel { x, y }
        }
    }
}

fn mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn key(logical: &WinitKey) -> Key {
    match logical {
        WinitKey::Named(NamedKey::Escape) => Key::Escape,
        WinitKey::Named(NamedKey::Enter) => Key::Enter,
        WinitKey::Named(NamedKey::Space) => Key::Space,
        WinitKey::Named(NamedKey::F11) => Key::F11,
        WinitKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::character(c),
                _ => Key::Unknown,
            }
        }
        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn printable_keys_are_case_insensitive() {
        assert_eq!(key(&WinitKey::Character(SmolStr::new("F"))), Key::Character('f'));
        assert_eq!(key(&WinitKey::Character(SmolStr::new("f"))), Key::Character('f'));
    }

    #[test]
    fn composed_strings_are_unknown() {
        assert_eq!(key(&WinitKey::Character(SmolStr::new("ff"))), Key::Unknown);
        assert_eq!(key(&WinitKey::Named(NamedKey::Tab)), Key::Unknown);
    }

    #[test]
    fn pixel_wheel_delta_is_logical() {
        let d = wheel_delta(2.0, MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 200.0)));
        assert_eq!(d, MouseWheelDelta::Pixel { x: 0.0, y: 100.0 });
        assert_eq!(d.steps(), 2.0);
    }

    #[test]
    fn focus_and_leave_translate_directly() {
        let s = InputState::default();
        assert_eq!(
            translate_window_event(1.0, &s, &WindowEvent::Focused(false)),
            Some(InputEvent::Focused(false))
        );
        assert_eq!(translate_window_event(1.0, &s, &WindowEvent::RedrawRequested), None);
    }
}
