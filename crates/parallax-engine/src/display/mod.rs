//! Viewport ownership.
//!
//! `ViewportManager` is the only writer of the current `Viewport`. The camera
//! and renderer learn about changes through `ViewportChanged`.

mod manager;

pub use manager::{FixedDisplay, HostDisplay, ViewportChanged, ViewportManager, DEFAULT_MAX_PIXEL_RATIO};
