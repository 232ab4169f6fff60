//! Camera state and the controllers that move it.
//!
//! `CameraController` runs in one of two modes fixed at construction:
//! - pointer orbit: position is a pure function of the latest pointer sample
//! - damped orbit: drag input feeds an `OrbitControls` with inertia

mod controller;
mod orbit;
mod pose;

pub use controller::{
    pointer_orbit_position, CameraConfig, CameraController, CameraMode, CameraModeConfig,
    PointerOrbitConfig,
};
pub use orbit::{DampedOrbitConfig, DampedOrbitControls, OrbitControls, OrbitDampingState};
pub use pose::{Camera, CameraPose, Projection};
