use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use crate::core::{App, AppControl, FrameScheduler, FrameStatus, Stage, StageConfig};
use crate::device::GpuInit;
use crate::display::HostDisplay;
use crate::fullscreen::{FullscreenApi, PresentationSurface};
use crate::input::platform::winit::translate_window_event;
use crate::loading::FileLoader;
use crate::render::WgpuRenderer;
use crate::scene::Scene;

/// How often the event loop wakes to deliver loads while nothing renders.
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub stage: StageConfig,
    /// Directory asset sources are resolved against.
    pub asset_root: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "parallax".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            stage: StageConfig::default(),
            asset_root: PathBuf::from("static"),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, hands its stage to `app.setup`, then starts the
    /// render loop and blocks until the window closes.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

// ── host capabilities backed by the window ───────────────────────────────

struct WindowDisplay(Arc<Window>);

impl HostDisplay for WindowDisplay {
    fn device_pixel_ratio(&self) -> f64 {
        self.0.scale_factor()
    }
}

/// winit exposes a single borderless fullscreen mode.
struct WindowSurface<'a>(&'a Window);

impl PresentationSurface for WindowSurface<'_> {
    fn supports(&self, api: FullscreenApi) -> bool {
        api == FullscreenApi::Standard
    }

    fn is_fullscreen(&self, _api: FullscreenApi) -> bool {
        self.0.fullscreen().is_some()
    }

    fn request_fullscreen(&mut self, _api: FullscreenApi) {
        self.0.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    fn exit_fullscreen(&mut self, _api: FullscreenApi) {
        self.0.set_fullscreen(None);
    }
}

struct WindowScheduler<'a>(&'a Window);

impl FrameScheduler for WindowScheduler<'_> {
    fn schedule_next_frame(&mut self) {
        self.0.request_redraw();
    }
}

fn logical_size(window: &Window, size: PhysicalSize<u32>) -> (u32, u32) {
    let logical = size.to_logical::<f64>(window.scale_factor());
    (logical.width.round() as u32, logical.height.round() as u32)
}

// ── per-window state ─────────────────────────────────────────────────────

#[self_referencing]
struct WindowEntry {
    window: Arc<Window>,

    #[borrows(window)]
    #[not_covariant]
    stage: Stage<Scene, WgpuRenderer<'this>>,
}

fn build_stage<'w>(
    window: &'w Arc<Window>,
    config: &RuntimeConfig,
    gpu_init: GpuInit,
) -> Result<Stage<Scene, WgpuRenderer<'w>>> {
    let renderer = pollster::block_on(WgpuRenderer::new(window.as_ref(), gpu_init))
        .context("GPU initialization failed")?;

    let (width, height) = logical_size(window, window.inner_size());
    let stage = Stage::new(
        config.stage.clone(),
        Box::new(WindowDisplay(Arc::clone(window))),
        width,
        height,
        Scene::new(),
        renderer,
        Box::new(FileLoader::new(config.asset_root.clone())),
    )?;
    Ok(stage)
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            exit_requested: false,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let id = window.id();

        let (config, gpu_init) = (&self.config, self.gpu_init.clone());
        let mut entry = WindowEntryTryBuilder {
            window: Arc::new(window),
            stage_builder: |w| build_stage(w, config, gpu_init),
        }
        .try_build()?;

        let app = &mut self.app;
        entry.with_mut(|fields| -> Result<()> {
            app.setup(&mut *fields.stage).context("application setup failed")?;
            fields.stage.start(&mut WindowScheduler(fields.window));
            Ok(())
        })?;

        log::info!("window {id:?} ready");
        self.entry = Some(entry);
        Ok(id)
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        if let Some(entry) = self.entry.as_mut() {
            entry.with_stage_mut(|stage| stage.stop());
        }
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create initial window: {e:#}");
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.entry.as_mut() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        // Loads land between frames; the loop never waits on them.
        let waiting_on_loads = entry.with_stage_mut(|stage| {
            stage.pump_loads();
            !stage.is_running() && stage.load_status().pending > 0
        });

        event_loop.set_control_flow(if waiting_on_loads {
            ControlFlow::WaitUntil(Instant::now() + LOAD_POLL_INTERVAL)
        } else {
            ControlFlow::Wait
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return;
        };

        if app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        let mut fatal = false;

        match &event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                self.request_exit(event_loop);
                return;
            }

            WindowEvent::Resized(size) => entry.with_mut(|fields| {
                let (w, h) = logical_size(fields.window, *size);
                if fields.stage.handle_resize(w, h).is_some() {
                    fields.window.request_redraw();
                }
            }),

            WindowEvent::ScaleFactorChanged { .. } => entry.with_stage_mut(|stage| {
                stage.handle_scale_change();
            }),

            WindowEvent::RedrawRequested => entry.with_mut(|fields| {
                let report = fields.stage.frame(&mut WindowScheduler(fields.window));
                fatal = report.is_some_and(|r| r.status == FrameStatus::Fatal);
            }),

            other => entry.with_mut(|fields| {
                let scale = fields.window.scale_factor();
                let Some(input) = translate_window_event(scale, fields.stage.input(), other) else {
                    return;
                };
                let mut surface = WindowSurface(fields.window);
                if let Some(toggle) = fields.stage.handle_input(&input, &mut surface) {
                    log::debug!("fullscreen toggle: {toggle:?}");
                }
            }),
        }

        if fatal {
            log::error!("renderer reported a fatal error; shutting down");
            self.request_exit(event_loop);
        }
    }
}
