use crate::camera::{CameraConfig, CameraController};
use crate::coords::{PointerState, Viewport};
use crate::display::{HostDisplay, ViewportChanged, ViewportManager, DEFAULT_MAX_PIXEL_RATIO};
use crate::error::ConfigurationError;
use crate::fullscreen::{FullscreenBindings, FullscreenController, FullscreenToggle, PresentationSurface};
use crate::input::{
    DoubleClickConfig, DoubleClickDetector, InputEvent, InputState, KeyState, MouseButton,
    MouseButtonState, PointerButtonEvent, PointerMoveEvent,
};
use crate::loading::{AssetLoader, LoadStatus, Resources};
use crate::time::Clock;

use super::render_loop::{FrameReport, FrameScheduler, RenderLoop};
use super::renderer::Renderer;

/// Everything a stage needs besides its host capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct StageConfig {
    pub max_pixel_ratio: f64,
    pub camera: CameraConfig,
    pub fullscreen: FullscreenBindings,
    pub double_click: DoubleClickConfig,
    /// Cap on the per-frame delta after stalls. `None` passes stalls through.
    pub max_frame_delta: Option<f64>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
            camera: CameraConfig::default(),
            fullscreen: FullscreenBindings::default(),
            double_click: DoubleClickConfig::default(),
            max_frame_delta: None,
        }
    }
}

/// One window's worth of render-loop state.
///
/// Routes host events to the owning component:
/// - resize and scale changes go to the viewport, then camera and renderer
/// - pointer input goes to the camera
/// - double click and the fullscreen key go to the fullscreen controller
/// - load completions go to the scene between frames
pub struct Stage<S, R> {
    viewport: ViewportManager,
    camera: CameraController,
    fullscreen: FullscreenController,
    bindings: FullscreenBindings,
    double_click: DoubleClickDetector,
    input: InputState,
    render_loop: RenderLoop<S>,
    resources: Resources<S>,
    scene: S,
    renderer: R,
}

impl<S: 'static, R: Renderer<S>> Stage<S, R> {
    /// Builds a stage for an initial viewport of `width` x `height` logical pixels.
    pub fn new(
        config: StageConfig,
        display: Box<dyn HostDisplay>,
        width: u32,
        height: u32,
        scene: S,
        renderer: R,
        loader: Box<dyn AssetLoader>,
    ) -> Result<Self, ConfigurationError> {
        Self::with_clock(config, display, width, height, scene, renderer, loader, Clock::new())
    }

    /// Like `new`, with a caller-supplied clock.
    #[allow(clippy::too_many_arguments)]
    pub fn with_clock(
        config: StageConfig,
        display: Box<dyn HostDisplay>,
        width: u32,
        height: u32,
        scene: S,
        mut renderer: R,
        loader: Box<dyn AssetLoader>,
        clock: Clock,
    ) -> Result<Self, ConfigurationError> {
        let viewport = ViewportManager::new(display, width, height, config.max_pixel_ratio)?;
        let vp = viewport.current();
        let camera = CameraController::new(config.camera, vp.aspect())?;

        renderer.set_output_size(vp.width_px, vp.height_px);
        renderer.set_pixel_ratio(vp.device_pixel_ratio);

        let clock = match config.max_frame_delta {
            Some(max) => clock.with_max_delta(max),
            None => clock,
        };

        Ok(Self {
            viewport,
            camera,
            fullscreen: FullscreenController::new(),
            bindings: config.fullscreen,
            double_click: DoubleClickDetector::new(config.double_click),
            input: InputState::default(),
            render_loop: RenderLoop::new(clock),
            resources: Resources::new(loader),
            scene,
            renderer,
        })
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport.current()
    }

    /// Viewport manager, for change subscriptions.
    pub fn viewport_mut(&mut self) -> &mut ViewportManager {
        &mut self.viewport
    }

    #[inline]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    #[inline]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn render_loop_mut(&mut self) -> &mut RenderLoop<S> {
        &mut self.render_loop
    }

    pub fn resources_mut(&mut self) -> &mut Resources<S> {
        &mut self.resources
    }

    pub fn fullscreen(&self) -> &FullscreenController {
        &self.fullscreen
    }

    /// Tracked pointer, button and modifier state.
    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[inline]
    pub fn load_status(&self) -> LoadStatus {
        self.resources.status()
    }

    /// New logical window size.
    pub fn handle_resize(&mut self, width: u32, height: u32) -> Option<ViewportChanged> {
        let change = self.viewport.on_resize(width, height)?;
        self.apply_viewport(change);
        Some(change)
    }

    /// The host display density changed without a resize.
    pub fn handle_scale_change(&mut self) -> Option<ViewportChanged> {
        let change = self.viewport.refresh_pixel_ratio()?;
        self.apply_viewport(change);
        Some(change)
    }

    fn apply_viewport(&mut self, change: ViewportChanged) {
        let vp = change.current;
        if change.size_changed() {
            self.camera.set_aspect(vp.aspect());
            self.renderer.set_output_size(vp.width_px, vp.height_px);
        }
        if change.pixel_ratio_changed() {
            self.renderer.set_pixel_ratio(vp.device_pixel_ratio);
        }
    }

    /// Applies one input event. Returns the fullscreen outcome when the event
    /// was a fullscreen binding.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        surface: &mut dyn PresentationSurface,
    ) -> Option<FullscreenToggle> {
        let drag = self.input.apply_event(event);
        let vp = self.viewport.current();

        match *event {
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.camera.on_pointer_move(PointerState::from_raw(x, y, vp));
                if let Some(d) = drag {
                    self.camera.on_drag(d.dx, d.dy, vp.height_px as f32);
                }
                None
            }

            InputEvent::MouseWheel { delta, .. } => {
                self.camera.on_wheel(delta.steps());
                None
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
                x,
                y,
                ..
            }) => {
                let now = self.render_loop.elapsed();
                let double = self.double_click.on_press(now, x, y);
                if double && self.bindings.double_click {
                    Some(self.fullscreen.toggle(surface))
                } else {
                    None
                }
            }

            InputEvent::Key {
                key,
                state: KeyState::Pressed,
                repeat: false,
                ..
            } if self.bindings.key == Some(key) => Some(self.fullscreen.toggle(surface)),

            InputEvent::Focused(false) => {
                self.double_click.reset();
                None
            }

            _ => None,
        }
    }

    /// Delivers finished loads into the scene. Returns how many finished.
    pub fn pump_loads(&mut self) -> usize {
        self.resources.pump(&mut self.scene)
    }

    pub fn start(&mut self, host: &mut dyn FrameScheduler) {
        self.render_loop.start(host);
    }

    pub fn stop(&mut self) {
        self.render_loop.stop();
        self.camera.stop();
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Host frame callback.
    pub fn frame(&mut self, host: &mut dyn FrameScheduler) -> Option<FrameReport> {
        self.render_loop
            .on_frame(&mut self.scene, &mut self.camera, &mut self.renderer, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraModeConfig, PointerOrbitConfig};
    use crate::core::render_loop::tests::{CountingScheduler, RecordingRenderer};
    use crate::display::FixedDisplay;
    use crate::fullscreen::{FakeSurface, FullscreenApi};
    use crate::input::{Key, Modifiers, MouseWheelDelta};
    use crate::loading::{LoadKind, ManualLoader};
    use crate::scene::{Mesh, Node, Scene, SceneGraph};
    use crate::time::ScriptedSource;
    use crate::coords::Color;

    const EPS: f32 = 1e-4;

    fn pointer_config() -> StageConfig {
        StageConfig {
            camera: CameraConfig {
                mode: CameraModeConfig::PointerOrbit(PointerOrbitConfig::default()),
                ..CameraConfig::default()
            },
            ..StageConfig::default()
        }
    }

    fn stage_with(
        config: StageConfig,
        ratio: f64,
        clock: &[f64],
    ) -> (Stage<Scene, RecordingRenderer>, ManualLoader) {
        let loader = ManualLoader::default();
        let stage = Stage::with_clock(
            config,
            Box::new(FixedDisplay(ratio)),
            800,
            600,
            Scene::new(),
            RecordingRenderer::default(),
            Box::new(loader.clone()),
            Clock::with_source(Box::new(ScriptedSource::new(clock))),
        )
        .unwrap();
        (stage, loader)
    }

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn release(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Released,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    // ── end to end ────────────────────────────────────────────────────────

    #[test]
    fn pointer_in_top_right_corner_orbits_behind_target() {
        let (mut stage, _) = stage_with(pointer_config(), 3.0, &[0.0]);
        let mut host = CountingScheduler::default();
        let mut surface = FakeSurface::default();

        assert_eq!(stage.viewport(), Viewport::new(800, 600, 2.0));
        assert_eq!(stage.renderer().pixel_ratio, Some(2.0));
        assert_eq!(stage.renderer().output_size, Some((800, 600)));

        stage.handle_input(&moved(800.0, 0.0), &mut surface);
        assert_eq!(stage.camera().pointer(), PointerState::new(0.5, 0.5));

        stage.start(&mut host);
        let report = stage.frame(&mut host).unwrap();
        assert_eq!(report.time.frame_index, 0);

        let p = stage.renderer().frames[0];
        assert!(p.x.abs() < EPS);
        assert!((p.z + 3.0).abs() < EPS);
    }

    // ── viewport coupling ─────────────────────────────────────────────────

    #[test]
    fn resize_updates_camera_and_renderer() {
        let (mut stage, _) = stage_with(StageConfig::default(), 1.0, &[0.0]);
        let change = stage.handle_resize(1920, 1080).unwrap();

        assert!(change.size_changed());
        assert_eq!(stage.camera().camera().aspect(), 1920.0 / 1080.0);
        assert_eq!(stage.renderer().output_size, Some((1920, 1080)));
    }

    #[test]
    fn minimized_window_keeps_previous_state() {
        let (mut stage, _) = stage_with(StageConfig::default(), 1.0, &[0.0]);
        let aspect = stage.camera().camera().aspect();
        assert!(stage.handle_resize(0, 0).is_none());
        assert_eq!(stage.camera().camera().aspect(), aspect);
        assert_eq!(stage.renderer().output_size, Some((800, 600)));
    }

    // ── fullscreen bindings ───────────────────────────────────────────────

    #[test]
    fn double_click_toggles_fullscreen() {
        // origin, then one clock read per press
        let (mut stage, _) = stage_with(StageConfig::default(), 1.0, &[0.0, 1.0, 1.2]);
        let mut surface = FakeSurface::with(&[FullscreenApi::Standard]);

        assert_eq!(stage.handle_input(&press(10.0, 10.0), &mut surface), None);
        stage.handle_input(&release(10.0, 10.0), &mut surface);
        assert_eq!(
            stage.handle_input(&press(10.0, 10.0), &mut surface),
            Some(FullscreenToggle::Entered)
        );
        assert!(surface.fullscreen);
    }

    #[test]
    fn fullscreen_key_toggles_once_per_press() {
        let (mut stage, _) = stage_with(StageConfig::default(), 1.0, &[0.0]);
        let mut surface = FakeSurface::with(&[FullscreenApi::Webkit]);
        let key = |repeat| InputEvent::Key {
            key: Key::character('F'),
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat,
        };

        assert_eq!(stage.handle_input(&key(false), &mut surface), Some(FullscreenToggle::Entered));
        assert_eq!(stage.handle_input(&key(true), &mut surface), None);
        assert_eq!(stage.handle_input(&key(false), &mut surface), Some(FullscreenToggle::Exited));
    }

    // ── damped orbit input ────────────────────────────────────────────────

    #[test]
    fn drag_and_wheel_move_damped_camera() {
        let (mut stage, _) = stage_with(StageConfig::default(), 1.0, &[0.0]);
        let mut host = CountingScheduler::default();
        let mut surface = FakeSurface::default();
        let start = stage.camera().camera().position();

        stage.handle_input(&press(400.0, 300.0), &mut surface);
        stage.handle_input(&moved(460.0, 300.0), &mut surface);
        stage.handle_input(&release(460.0, 300.0), &mut surface);
        stage.handle_input(
            &InputEvent::MouseWheel {
                delta: MouseWheelDelta::Line { x: 0.0, y: 2.0 },
                modifiers: Modifiers::default(),
            },
            &mut surface,
        );

        stage.start(&mut host);
        stage.frame(&mut host);
        let p = stage.camera().camera().position();
        assert!((p - start).length() > EPS);
        assert!(p.length() < start.length());
    }

    // ── loading ───────────────────────────────────────────────────────────

    #[test]
    fn completed_load_recolors_node_between_frames() {
        let (mut stage, loader) = stage_with(StageConfig::default(), 1.0, &[0.0]);
        let id = stage.scene_mut().add(Node::new(Mesh::UNIT_CUBE, Color::WHITE));

        let task = stage.resources_mut().load(LoadKind::Texture, "/textures/color.jpg", move |scene: &mut Scene, r| {
            if r.is_ok() {
                if let Some(node) = scene.get_mut(id) {
                    node.color = Color::from_hex(0xff0000);
                }
            }
        });

        assert_eq!(stage.pump_loads(), 0);
        assert_eq!(stage.scene().node(id).map(|n| n.color), Some(Color::WHITE));

        loader.finish_ok(task, &[0xff]);
        assert_eq!(stage.pump_loads(), 1);
        assert_eq!(stage.scene().node(id).map(|n| n.color), Some(Color::from_hex(0xff0000)));
    }

    #[test]
    fn stop_halts_rendering() {
        let (mut stage, _) = stage_with(StageConfig::default(), 1.0, &[0.0]);
        let mut host = CountingScheduler::default();
        stage.start(&mut host);
        stage.frame(&mut host);
        stage.stop();
        assert!(stage.frame(&mut host).is_none());
        assert_eq!(stage.renderer().frames.len(), 1);
    }
}
