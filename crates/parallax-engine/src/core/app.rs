use winit::event::WindowEvent;

use crate::scene::Scene;

use super::renderer::Renderer;
use super::stage::Stage;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Lesson contract implemented by binaries.
///
/// The runtime owns the window and the stage; the app populates the scene
/// and registers its per-frame mutators once everything exists.
pub trait App {
    /// Called once, after the window, renderer and stage are created and
    /// before the loop starts.
    fn setup<R: Renderer<Scene>>(&mut self, stage: &mut Stage<Scene, R>) -> anyhow::Result<()>;

    /// Called for every window event before the stage sees it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }
}
