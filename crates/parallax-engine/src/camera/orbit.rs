use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::error::ConfigurationError;

use super::pose::CameraPose;

/// Drag-to-orbit capability driven once per frame.
///
/// Implementations keep their own inertia; the controller only guarantees
/// that `update` runs exactly once per rendered frame. Skipping a frame
/// stutters but is otherwise harmless.
pub trait OrbitControls {
    /// Advances the orbit by one frame and writes the result into `pose`.
    fn update(&mut self, pose: &mut CameraPose);

    fn enable_damping(&self) -> bool;

    fn set_enable_damping(&mut self, enabled: bool);

    /// Pointer drag in logical pixels. `viewport_height` normalizes speed.
    fn rotate(&mut self, dx_px: f32, dy_px: f32, viewport_height: f32) {
        let _ = (dx_px, dy_px, viewport_height);
    }

    /// Wheel input; positive steps move closer.
    fn zoom(&mut self, steps: f32) {
        let _ = steps;
    }

    /// Cancels any remaining motion.
    fn stop(&mut self) {}

    fn damping_state(&self) -> Option<OrbitDampingState> {
        None
    }
}

/// Inertia snapshot of a damped orbit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitDampingState {
    /// Pending (azimuth, polar) rotation in radians per frame.
    pub current_angular_velocity: Vec2,
    pub damping_factor: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DampedOrbitConfig {
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied each frame, in (0, 1).
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for DampedOrbitConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

impl DampedOrbitConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.damping_factor > 0.0 && self.damping_factor < 1.0) {
            return Err(ConfigurationError::DampingFactor {
                factor: self.damping_factor,
            });
        }
        if !(self.min_distance >= 0.0 && self.max_distance > self.min_distance) {
            return Err(ConfigurationError::OrbitDistance {
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        Ok(())
    }
}

// Keeps the camera off the poles, where the up vector degenerates. Must stay
// well above f32 resolution near 1.0 or `cos` rounds it back onto the pole.
const POLAR_EPSILON: f32 = 1e-3;

/// Orbit angles around the target, in radians.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Spherical {
    azimuth: f32,
    polar: f32,
    radius: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        Self {
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            radius,
        }
    }

    fn offset(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.radius
            * Vec3::new(
                sin_polar * self.azimuth.sin(),
                self.polar.cos(),
                sin_polar * self.azimuth.cos(),
            )
    }
}

/// Orbit around `CameraPose::target` with exponential decay of the drag velocity.
///
/// The angles are owned by the controls and only re-derived from the pose
/// when someone else moved the camera.
#[derive(Debug, Clone)]
pub struct DampedOrbitControls {
    config: DampedOrbitConfig,
    velocity: Vec2,
    zoom_scale: f32,
    spherical: Option<Spherical>,
    /// (position, target) written by the last update.
    written: Option<(Vec3, Vec3)>,
}

impl DampedOrbitControls {
    pub fn new(config: DampedOrbitConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config,
            velocity: Vec2::ZERO,
            zoom_scale: 1.0,
            spherical: None,
            written: None,
        })
    }

    pub fn config(&self) -> &DampedOrbitConfig {
        &self.config
    }

    fn sync(&mut self, pose: &CameraPose) -> Option<Spherical> {
        let current = (pose.position, pose.target);
        if self.written != Some(current) || self.spherical.is_none() {
            let offset = pose.position - pose.target;
            if offset.length() <= f32::EPSILON {
                return None;
            }
            self.spherical = Some(Spherical::from_offset(offset));
        }
        self.spherical
    }
}

impl OrbitControls for DampedOrbitControls {
    fn update(&mut self, pose: &mut CameraPose) {
        let Some(mut sph) = self.sync(pose) else {
            return;
        };

        let step = if self.config.enable_damping {
            self.velocity * self.config.damping_factor
        } else {
            self.velocity
        };
        sph.azimuth += step.x;
        sph.polar = (sph.polar + step.y).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        sph.radius = (sph.radius * self.zoom_scale)
            .clamp(self.config.min_distance, self.config.max_distance)
            .max(f32::EPSILON);
        self.zoom_scale = 1.0;

        pose.position = pose.target + sph.offset();
        self.spherical = Some(sph);
        self.written = Some((pose.position, pose.target));

        if self.config.enable_damping {
            self.velocity *= 1.0 - self.config.damping_factor;
        } else {
            self.velocity = Vec2::ZERO;
        }
    }

    fn enable_damping(&self) -> bool {
        self.config.enable_damping
    }

    fn set_enable_damping(&mut self, enabled: bool) {
        self.config.enable_damping = enabled;
    }

    fn rotate(&mut self, dx_px: f32, dy_px: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        // A drag across the full viewport height is one full turn.
        self.velocity.x -= TAU * dx_px / h * self.config.rotate_speed;
        self.velocity.y -= TAU * dy_px / h * self.config.rotate_speed;
    }

    fn zoom(&mut self, steps: f32) {
        self.zoom_scale *= 0.95_f32.powf(self.config.zoom_speed * steps);
    }

    fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.zoom_scale = 1.0;
    }

    fn damping_state(&self) -> Option<OrbitDampingState> {
        Some(OrbitDampingState {
            current_angular_velocity: self.velocity,
            damping_factor: self.config.damping_factor,
        })
    }
}
