use glam::{Mat4, Vec3};

use crate::error::ConfigurationError;

/// Where the camera sits, what it looks at, and its frustum depth.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view, degrees. Used by perspective projection.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            fov_deg: 75.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraPose {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.near > 0.0) {
            return Err(ConfigurationError::NonPositiveNear { near: self.near });
        }
        if !(self.far > self.near) {
            return Err(ConfigurationError::FarNotBeyondNear {
                near: self.near,
                far: self.far,
            });
        }
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(ConfigurationError::FieldOfView {
                fov_deg: self.fov_deg,
            });
        }
        Ok(())
    }
}

/// Projection model.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum Projection {
    /// Perspective using `CameraPose::fov_deg`.
    #[default]
    Perspective,
    /// Orthographic box; horizontal extent follows the aspect ratio so
    /// objects are not squished.
    Orthographic { half_height: f32 },
}

/// Pose plus projection, with the projection matrix cached until the aspect
/// ratio or projection parameters change.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pose: CameraPose,
    projection: Projection,
    aspect: f32,
    projection_matrix: Mat4,
}

impl Camera {
    pub fn new(pose: CameraPose, projection: Projection, aspect: f32) -> Result<Self, ConfigurationError> {
        pose.validate()?;
        if let Projection::Orthographic { half_height } = projection {
            if !(half_height > 0.0) {
                return Err(ConfigurationError::OrthographicExtent { half_height });
            }
        }

        let mut camera = Self {
            pose,
            projection,
            aspect: sanitize_aspect(aspect),
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        Ok(camera)
    }

    #[inline]
    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.pose.position = position;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.pose.target = target;
    }

    /// Pose access for orbit controls. Frustum depth must stay valid.
    pub(crate) fn pose_mut(&mut self) -> &mut CameraPose {
        &mut self.pose
    }

    /// Updates the aspect ratio and recomputes the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        let p = &self.pose;
        self.projection_matrix = match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(p.fov_deg.to_radians(), self.aspect, p.near, p.far)
            }
            Projection::Orthographic { half_height } => {
                let half_width = half_height * self.aspect;
                Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, p.near, p.far)
            }
        };
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.pose.position, self.pose.target, Vec3::Y)
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect > 0.0 && aspect.is_finite() { aspect } else { 1.0 }
}
