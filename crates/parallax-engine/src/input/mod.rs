//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code translates platform events into `InputEvent`s.

mod double_click;
mod state;
mod types;

pub(crate) mod platform {
    pub(crate) mod winit;
}

pub use double_click::{DoubleClickConfig, DoubleClickDetector};
pub use state::{InputState, PointerDrag};
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent, PointerMoveEvent,
};
