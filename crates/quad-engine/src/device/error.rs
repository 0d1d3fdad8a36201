use thiserror::Error;

use crate::render::{GeometryError, ShaderStage};

/// Fatal setup failure.
///
/// Every step of renderer and surface setup reports one of these kinds. The
/// runtime aggregates them into a single fatal path; none of them is retried.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(String),

    #[error("failed to create GPU device/queue: {0}")]
    DeviceRequest(String),

    #[error("failed to create presentation surface: {0}")]
    SurfaceCreation(String),

    #[error("surface does not support color format {requested:?}")]
    UnsupportedSurfaceFormat { requested: wgpu::TextureFormat },

    #[error("invalid quad geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("shader `{label}` failed to parse:\n{message}")]
    ShaderParse { label: String, message: String },

    #[error("shader `{label}` failed validation: {message}")]
    ShaderValidation { label: String, message: String },

    #[error("shader `{label}` has no {stage:?} entry point named `{name}`")]
    MissingEntryPoint {
        label: String,
        stage: ShaderStage,
        name: String,
    },

    #[error("failed to build pipeline state: {0}")]
    Pipeline(String),
}
