use crate::camera::Camera;

/// Outcome of one `render_frame` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    Presented,
    /// Transient surface trouble; the next frame may succeed.
    Skipped,
    /// The output cannot recover. The loop stops.
    Fatal,
}

/// Rasterizer consumed by the render loop.
///
/// Sizes are logical pixels; the renderer multiplies by the pixel ratio for
/// its output buffer.
pub trait Renderer<S> {
    fn render_frame(&mut self, scene: &S, camera: &Camera) -> FrameStatus;

    fn set_output_size(&mut self, width: u32, height: u32);

    fn set_pixel_ratio(&mut self, ratio: f64);
}
