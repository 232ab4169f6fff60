//! winit host.
//!
//! Owns the event loop and the window, builds the stage and reference
//! renderer for it, and feeds it resize, input and redraw events.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
