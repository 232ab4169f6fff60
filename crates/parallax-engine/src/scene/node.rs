use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::coords::Color;

/// Handle to a node inside one scene. Stable for the scene's lifetime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// Geometry a node draws with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Mesh {
    /// Axis-aligned box centred on the origin.
    Box { size: Vec3 },
}

impl Mesh {
    pub const UNIT_CUBE: Mesh = Mesh::Box { size: Vec3::ONE };
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Node {
    pub transform: Transform,
    pub mesh: Mesh,
    pub color: Color,
    pub visible: bool,
}

impl Node {
    pub fn new(mesh: Mesh, color: Color) -> Self {
        Self {
            transform: Transform::default(),
            mesh,
            color,
            visible: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Model matrix including the mesh's own size.
    pub fn model_matrix(&self) -> Mat4 {
        let Mesh::Box { size } = self.mesh;
        self.transform.matrix() * Mat4::from_scale(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn model_matrix_applies_size_before_transform() {
        let node = Node::new(Mesh::Box { size: Vec3::new(2.0, 1.0, 1.0) }, Color::WHITE)
            .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -5.0)));
        let corner = node.model_matrix().transform_point3(Vec3::new(0.5, 0.5, 0.5));
        assert!((corner - Vec3::new(1.0, 0.5, -4.5)).length() < 1e-6);
    }
}
