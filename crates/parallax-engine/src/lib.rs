//! Parallax engine crate.
//!
//! Render loop, viewport tracking and orbit-camera control, plus a winit
//! host and a wgpu reference renderer that drive them.

pub mod camera;
pub mod coords;
pub mod core;
pub mod device;
pub mod display;
pub mod error;
pub mod events;
pub mod fullscreen;
pub mod input;
pub mod loading;
pub mod logging;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
