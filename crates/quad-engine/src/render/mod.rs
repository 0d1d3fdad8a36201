//! Render pipeline setup and the per-frame draw protocol.
//!
//! The renderer is written against the `device` traits: it describes each
//! frame as a [`FramePlan`] and lets the device record and submit it.
//!
//! Convention:
//! - positions are homogeneous clip-space coordinates, no projection
//! - slot 0 carries positions, slot 1 carries UVs

mod frame;
mod geometry;
mod renderer;
mod shader;

#[cfg(test)]
pub(crate) mod testing;

pub use frame::{
    ClearColor, ColorAttachmentPlan, DrawCall, FramePlan, LoadAction, PipelineDesc,
    RenderPassPlan, StoreAction, VertexBinding,
};
pub use geometry::{
    GeometryError, QuadGeometry, VertexStream, POSITION_STREAM, QUAD_VERTEX_COUNT, UV_STREAM,
};
pub use renderer::{FrameOutcome, FrameStats, Renderer, RendererConfig};
pub use shader::{CompiledShader, ShaderSource, ShaderStage};
