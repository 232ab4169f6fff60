//! Error taxonomy shared by the engine components.
//!
//! Only configuration mistakes are fatal. Everything else degrades in place and
//! is reported through return values, hooks, or the log.

use thiserror::Error;

use crate::loading::TaskId;

/// Invalid construction parameters. Surfaced immediately from constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("camera near plane must be positive (got {near})")]
    NonPositiveNear { near: f32 },

    #[error("camera far plane ({far}) must lie beyond the near plane ({near})")]
    FarNotBeyondNear { near: f32, far: f32 },

    #[error("field of view must be within (0, 180) degrees (got {fov_deg})")]
    FieldOfView { fov_deg: f32 },

    #[error("orthographic half height must be positive (got {half_height})")]
    OrthographicExtent { half_height: f32 },

    #[error("initial viewport {width}x{height} is degenerate and there is no previous size to fall back to")]
    ZeroViewport { width: u32, height: u32 },

    #[error("maximum pixel ratio must be positive and finite (got {max})")]
    PixelRatioCap { max: f64 },

    #[error("damping factor must lie in (0, 1) (got {factor})")]
    DampingFactor { factor: f32 },

    #[error("orbit radius must be positive (got {radius})")]
    OrbitRadius { radius: f32 },

    #[error("orbit distance range {min}..{max} is empty or non-positive")]
    OrbitDistance { min: f32, max: f32 },
}

/// A load task id that cannot transition. Caller bug; never crashes the loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum InvalidTaskError {
    #[error("load task {0} was never requested")]
    Unknown(TaskId),

    #[error("load task {0} has already finished")]
    AlreadyFinished(TaskId),
}

/// Reported by an asset loader when a fetch fails.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {source_id}")]
    Io {
        source_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("loader worker for {0} disconnected before reporting")]
    Disconnected(String),
}
