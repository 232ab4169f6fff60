//! wgpu reference renderer.
//!
//! Draws `Scene` nodes as instanced, lit boxes into a depth-tested pass.
//! World space is right-handed, +Y up; clip depth is [0, 1].

mod mesh;
mod wgpu_renderer;

pub use wgpu_renderer::WgpuRenderer;
