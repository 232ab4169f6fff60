use std::f32::consts::TAU;
use std::fmt;

use glam::Vec3;

use crate::coords::PointerState;
use crate::error::ConfigurationError;

use super::orbit::{DampedOrbitConfig, DampedOrbitControls, OrbitControls};
use super::pose::{Camera, CameraPose, Projection};

/// Pointer-driven orbit parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerOrbitConfig {
    /// Horizontal distance of the camera from the vertical axis.
    pub orbit_radius: f32,
    /// World units of height per unit of normalized pointer Y.
    pub vertical_speed: f32,
}

impl Default for PointerOrbitConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 3.0,
            vertical_speed: 5.0,
        }
    }
}

impl PointerOrbitConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.orbit_radius > 0.0 && self.orbit_radius.is_finite()) {
            return Err(ConfigurationError::OrbitRadius {
                radius: self.orbit_radius,
            });
        }
        Ok(())
    }
}

/// Which camera mode to build.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CameraModeConfig {
    PointerOrbit(PointerOrbitConfig),
    DampedOrbit(DampedOrbitConfig),
}

impl Default for CameraModeConfig {
    fn default() -> Self {
        Self::DampedOrbit(DampedOrbitConfig::default())
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CameraConfig {
    pub pose: CameraPose,
    pub projection: Projection,
    pub mode: CameraModeConfig,
}

/// Live camera mode. Fixed for the lifetime of the controller.
pub enum CameraMode {
    PointerOrbit(PointerOrbitConfig),
    DampedOrbit(Box<dyn OrbitControls>),
}

impl fmt::Debug for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointerOrbit(cfg) => f.debug_tuple("PointerOrbit").field(cfg).finish(),
            Self::DampedOrbit(controls) => f
                .debug_struct("DampedOrbit")
                .field("enable_damping", &controls.enable_damping())
                .field("state", &controls.damping_state())
                .finish(),
        }
    }
}

/// Camera position for a pointer sample.
///
/// A full sweep of the pointer across the viewport walks once around a circle
/// of `orbit_radius` in the XZ plane; pointer Y lifts the camera. The result
/// depends on the current sample only.
pub fn pointer_orbit_position(pointer: PointerState, config: &PointerOrbitConfig) -> Vec3 {
    let angle = pointer.normalized_x * TAU;
    Vec3::new(
        angle.sin() * config.orbit_radius,
        pointer.normalized_y * config.vertical_speed,
        angle.cos() * config.orbit_radius,
    )
}

/// Owns the camera and turns pointer input into a new pose every frame.
#[derive(Debug)]
pub struct CameraController {
    camera: Camera,
    mode: CameraMode,
    pointer: PointerState,
}

impl CameraController {
    /// Builds the camera and the configured mode.
    pub fn new(config: CameraConfig, aspect: f32) -> Result<Self, ConfigurationError> {
        let mode = match config.mode {
            CameraModeConfig::PointerOrbit(cfg) => {
                cfg.validate()?;
                CameraMode::PointerOrbit(cfg)
            }
            CameraModeConfig::DampedOrbit(cfg) => {
                CameraMode::DampedOrbit(Box::new(DampedOrbitControls::new(cfg)?))
            }
        };

        Ok(Self {
            camera: Camera::new(config.pose, config.projection, aspect)?,
            mode,
            pointer: PointerState::default(),
        })
    }

    /// Damped-orbit controller over caller-supplied controls.
    pub fn with_controls(
        pose: CameraPose,
        projection: Projection,
        aspect: f32,
        controls: Box<dyn OrbitControls>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            camera: Camera::new(pose, projection, aspect)?,
            mode: CameraMode::DampedOrbit(controls),
            pointer: PointerState::default(),
        })
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn mode(&self) -> &CameraMode {
        &self.mode
    }

    #[inline]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Per-frame update. Must run once per rendered frame, before drawing.
    pub fn update(&mut self) {
        match &mut self.mode {
            CameraMode::PointerOrbit(cfg) => {
                let target = self.camera.pose().target;
                self.camera.set_position(pointer_orbit_position(self.pointer, cfg));
                self.camera.look_at(target);
            }
            CameraMode::DampedOrbit(controls) => controls.update(self.camera.pose_mut()),
        }
    }

    /// Records the latest pointer sample. Earlier samples are discarded.
    pub fn on_pointer_move(&mut self, pointer: PointerState) {
        self.pointer = pointer;
    }

    /// Drag delta in logical pixels. Ignored in pointer-orbit mode.
    pub fn on_drag(&mut self, dx_px: f32, dy_px: f32, viewport_height: f32) {
        if let CameraMode::DampedOrbit(controls) = &mut self.mode {
            controls.rotate(dx_px, dy_px, viewport_height);
        }
    }

    /// Wheel steps; positive zooms in. Ignored in pointer-orbit mode.
    pub fn on_wheel(&mut self, steps: f32) {
        if let CameraMode::DampedOrbit(controls) = &mut self.mode {
            controls.zoom(steps);
        }
    }

    /// Recomputes the projection for a new aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// Halts any orbit inertia.
    pub fn stop(&mut self) {
        if let CameraMode::DampedOrbit(controls) = &mut self.mode {
            controls.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::camera::OrbitDampingState;
    use std::cell::Cell;
    use std::rc::Rc;

    const EPS: f32 = 1e-4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    fn pointer_controller() -> CameraController {
        let config = CameraConfig {
            mode: CameraModeConfig::PointerOrbit(PointerOrbitConfig::default()),
            ..CameraConfig::default()
        };
        CameraController::new(config, 800.0 / 600.0).unwrap()
    }

    // ── pointer orbit ─────────────────────────────────────────────────────

    #[test]
    fn pointer_orbit_stays_on_circle() {
        let cfg = PointerOrbitConfig::default();
        for i in 0..=100 {
            let x = -0.5 + i as f32 / 100.0;
            let p = pointer_orbit_position(PointerState::new(x, 0.2), &cfg);
            assert!(approx(p.x * p.x + p.z * p.z, cfg.orbit_radius * cfg.orbit_radius));
        }
    }

    #[test]
    fn pointer_orbit_has_no_memory() {
        let mut c = pointer_controller();
        c.on_pointer_move(PointerState::new(0.3, -0.1));
        c.update();
        let first = c.camera().position();

        c.on_pointer_move(PointerState::new(-0.4, 0.4));
        c.update();
        c.on_pointer_move(PointerState::new(0.3, -0.1));
        c.update();
        c.update();

        assert!((c.camera().position() - first).length() < EPS);
    }

    #[test]
    fn top_right_corner_puts_camera_behind_target() {
        let vp = Viewport::new(800, 600, 2.0);
        let mut c = pointer_controller();
        c.on_pointer_move(PointerState::from_raw(800.0, 0.0, vp));
        c.update();

        let p = c.camera().position();
        assert!(approx(p.x, 0.0));
        assert!(approx(p.z, -3.0));
        assert!(approx(p.y, 2.5));
        assert_eq!(c.camera().pose().target, Vec3::ZERO);
    }

    #[test]
    fn drag_and_wheel_are_ignored_in_pointer_mode() {
        let mut c = pointer_controller();
        c.update();
        let before = c.camera().position();
        c.on_drag(100.0, 50.0, 600.0);
        c.on_wheel(3.0);
        c.update();
        assert_eq!(c.camera().position(), before);
    }

    #[test]
    fn zero_radius_is_rejected() {
        let config = CameraConfig {
            mode: CameraModeConfig::PointerOrbit(PointerOrbitConfig {
                orbit_radius: 0.0,
                vertical_speed: 5.0,
            }),
            ..CameraConfig::default()
        };
        assert_eq!(
            CameraController::new(config, 1.0).err(),
            Some(ConfigurationError::OrbitRadius { radius: 0.0 })
        );
    }

    // ── damped orbit ──────────────────────────────────────────────────────

    struct CountingControls {
        updates: Rc<Cell<u32>>,
        damping: bool,
    }

    impl OrbitControls for CountingControls {
        fn update(&mut self, _pose: &mut CameraPose) {
            self.updates.set(self.updates.get() + 1);
        }

        fn enable_damping(&self) -> bool {
            self.damping
        }

        fn set_enable_damping(&mut self, enabled: bool) {
            self.damping = enabled;
        }
    }

    #[test]
    fn damped_mode_updates_controls_once_per_call() {
        let updates = Rc::new(Cell::new(0));
        let mut c = CameraController::with_controls(
            CameraPose::default(),
            Projection::Perspective,
            1.0,
            Box::new(CountingControls {
                updates: updates.clone(),
                damping: true,
            }),
        )
        .unwrap();

        for _ in 0..5 {
            c.update();
        }
        assert_eq!(updates.get(), 5);
    }

    #[test]
    fn drag_then_stop_leaves_no_inertia() {
        let mut c = CameraController::new(CameraConfig::default(), 1.0).unwrap();
        c.on_drag(120.0, 0.0, 600.0);
        c.update();
        c.stop();

        let CameraMode::DampedOrbit(controls) = c.mode() else {
            panic!("default mode is damped orbit");
        };
        assert_eq!(
            controls.damping_state().map(|s: OrbitDampingState| s.current_angular_velocity.length()),
            Some(0.0)
        );

        let before = c.camera().position();
        c.update();
        assert!((c.camera().position() - before).length() < EPS);
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn set_aspect_updates_projection() {
        let mut c = CameraController::new(CameraConfig::default(), 4.0 / 3.0).unwrap();
        let before = c.camera().projection_matrix();
        c.set_aspect(16.0 / 9.0);
        assert_eq!(c.camera().aspect(), 16.0 / 9.0);
        assert_ne!(c.camera().projection_matrix(), before);
    }
}
