//! Coordinate and color types shared by the camera, viewport and renderers.
//!
//! Canonical input space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! `PointerState` converts that into the centred, Y-up space the camera uses.

mod color;
mod pointer;
mod viewport;

pub use color::Color;
pub use pointer::PointerState;
pub use viewport::Viewport;
