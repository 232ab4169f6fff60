use anyhow::Result;
use clap::{Parser, ValueEnum};
use glam::Vec3;
use std::path::PathBuf;

use parallax_engine::camera::{
    CameraConfig, CameraModeConfig, CameraPose, DampedOrbitConfig, PointerOrbitConfig,
};
use parallax_engine::coords::Color;
use parallax_engine::core::{App, Renderer, Stage, StageConfig};
use parallax_engine::device::GpuInit;
use parallax_engine::loading::LoadKind;
use parallax_engine::logging::{init_logging, LoggingConfig};
use parallax_engine::scene::{Mesh, Node, NodeId, Scene, SceneGraph, Transform};
use parallax_engine::window::{Runtime, RuntimeConfig};

#[derive(Parser)]
#[command(name = "parallax-studio", about = "Orbiting-camera scene viewer")]
struct Cli {
    /// Camera control scheme
    #[arg(long, value_enum, default_value_t = Mode::Damped)]
    mode: Mode,

    /// Upper bound on the device pixel ratio
    #[arg(long, default_value_t = 2.0)]
    max_pixel_ratio: f64,

    /// Directory textures are loaded from
    #[arg(long, default_value = "static")]
    assets: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Mode {
    /// Camera follows the pointer around the vertical axis
    Pointer,
    /// Drag to orbit with inertia, wheel to zoom
    Damped,
}

const RING_COUNT: usize = 8;
const RING_RADIUS: f32 = 2.0;

/// A spinning cube surrounded by a ring of smaller boxes.
struct Lesson;

impl Lesson {
    fn populate(scene: &mut Scene) -> NodeId {
        scene.background = Color::from_hex(0x101018);

        let cube = scene.add(Node::new(Mesh::UNIT_CUBE, Color::from_hex(0xff0000)));

        for i in 0..RING_COUNT {
            let angle = i as f32 / RING_COUNT as f32 * std::f32::consts::TAU;
            let position = Vec3::new(angle.cos() * RING_RADIUS, -0.5, angle.sin() * RING_RADIUS);
            let node = Node::new(Mesh::Box { size: Vec3::splat(0.3) }, Color::from_hex(0x44aa88))
                .with_transform(Transform::from_position(position));
            scene.add(node);
        }

        cube
    }
}

impl App for Lesson {
    fn setup<R: Renderer<Scene>>(&mut self, stage: &mut Stage<Scene, R>) -> Result<()> {
        let cube = Self::populate(stage.scene_mut());

        stage.render_loop_mut().register(move |frame| {
            if let Some(t) = frame.scene.node_mut(cube) {
                t.rotation.y = frame.time.elapsed as f32;
            }
        });

        // Batch start and completion are already logged by the manager.
        let resources = stage.resources_mut();
        resources
            .manager_mut()
            .on_progress(|done, total| log::info!("loading {done}/{total}"));

        // The cube keeps its flat color until the texture arrives, and for
        // good if it never does.
        resources.load(LoadKind::Texture, "/textures/door/color.jpg", move |scene: &mut Scene, result| {
            let Ok(asset) = result else { return };
            log::debug!("{} ({} bytes)", asset.source, asset.bytes.len());
            if let Some(node) = scene.get_mut(cube) {
                node.color = Color::WHITE;
            }
        });

        Ok(())
    }
}

fn camera_config(mode: Mode) -> CameraConfig {
    let mode = match mode {
        Mode::Pointer => CameraModeConfig::PointerOrbit(PointerOrbitConfig::default()),
        Mode::Damped => CameraModeConfig::DampedOrbit(DampedOrbitConfig {
            min_distance: 1.5,
            max_distance: 20.0,
            ..DampedOrbitConfig::default()
        }),
    };

    CameraConfig {
        pose: CameraPose {
            position: Vec3::new(0.0, 1.0, 3.0),
            ..CameraPose::default()
        },
        mode,
        ..CameraConfig::default()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        default_level: if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
        ..LoggingConfig::default()
    });

    let config = RuntimeConfig {
        title: "parallax studio".to_string(),
        stage: StageConfig {
            max_pixel_ratio: cli.max_pixel_ratio,
            camera: camera_config(cli.mode),
            max_frame_delta: Some(0.1),
            ..StageConfig::default()
        },
        asset_root: cli.assets,
        ..RuntimeConfig::default()
    };

    log::info!("starting in {:?} mode", cli.mode);
    Runtime::run(config, GpuInit::default(), Lesson)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["parallax-studio"]);
        assert_eq!(cli.mode, Mode::Damped);
        assert_eq!(cli.max_pixel_ratio, 2.0);
        assert!(!cli.verbose);
    }

    #[test]
    fn pointer_mode_builds_pointer_orbit() {
        let cfg = camera_config(Mode::Pointer);
        assert!(matches!(cfg.mode, CameraModeConfig::PointerOrbit(_)));
    }

    #[test]
    fn lesson_scene_has_cube_and_ring() {
        let mut scene = Scene::new();
        let cube = Lesson::populate(&mut scene);
        assert_eq!(scene.len(), RING_COUNT + 1);
        assert_eq!(scene.node(cube).map(|n| n.mesh), Some(Mesh::UNIT_CUBE));
    }

    // ── setup against a headless stage ─────────────────────────────────────

    use parallax_engine::camera::Camera;
    use parallax_engine::core::FrameStatus;
    use parallax_engine::display::FixedDisplay;
    use parallax_engine::error::LoadError;
    use parallax_engine::loading::{AssetLoader, LoadRequest, LoadResult, TaskId};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct NullRenderer;

    impl Renderer<Scene> for NullRenderer {
        fn render_frame(&mut self, _scene: &Scene, _camera: &Camera) -> FrameStatus {
            FrameStatus::Presented
        }
        fn set_output_size(&mut self, _width: u32, _height: u32) {}
        fn set_pixel_ratio(&mut self, _ratio: f64) {}
    }

    /// Fails every request on the next poll.
    #[derive(Default)]
    struct MissingFiles {
        requested: Rc<RefCell<Vec<LoadRequest>>>,
        queued: Vec<LoadRequest>,
    }

    impl AssetLoader for MissingFiles {
        fn start(&mut self, request: LoadRequest) {
            self.requested.borrow_mut().push(request.clone());
            self.queued.push(request);
        }

        fn poll_completed(&mut self) -> Vec<(TaskId, LoadResult)> {
            self.queued
                .drain(..)
                .map(|r| (r.task, Err(LoadError::Disconnected(r.source))))
                .collect()
        }
    }

    #[test]
    fn failed_texture_keeps_the_flat_cube() {
        let loader = MissingFiles::default();
        let requested = loader.requested.clone();
        let mut stage = Stage::new(
            StageConfig::default(),
            Box::new(FixedDisplay(1.0)),
            800,
            600,
            Scene::new(),
            NullRenderer,
            Box::new(loader),
        )
        .unwrap();

        Lesson.setup(&mut stage).unwrap();
        assert_eq!(stage.load_status().pending, 1);
        assert_eq!(requested.borrow()[0].source, "/textures/door/color.jpg");

        assert_eq!(stage.pump_loads(), 1);
        let status = stage.load_status();
        assert_eq!((status.pending, status.failed), (0, 1));

        let cube = stage.scene().nodes()[0];
        assert_eq!(cube.color, Color::from_hex(0xff0000));
    }
}
