//! Core engine-facing contracts.
//!
//! Defines the render loop, the renderer capability it drives, and the
//! per-window `Stage` that ties viewport, camera, fullscreen and loading
//! together. The runtime feeds a stage; lessons implement `App`.

mod app;
mod render_loop;
mod renderer;
mod stage;

pub use app::{App, AppControl};
pub use render_loop::{FrameReport, FrameScheduler, FrameState, LoopState, MutatorId, RenderLoop};
pub use renderer::{FrameStatus, Renderer};
pub use stage::{Stage, StageConfig};
