use std::ops::Range;

use super::VertexStream;

/// RGBA clear color, components in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ClearColor {
    pub const OPAQUE_BLACK: ClearColor = ClearColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
}

/// What happens to the target's previous contents when the pass starts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LoadAction {
    Clear(ClearColor),
    Load,
}

/// What happens to the rendered contents when the pass ends.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StoreAction {
    Store,
    Discard,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorAttachmentPlan {
    pub load: LoadAction,
    pub store: StoreAction,
}

/// Render pass description; color attachment 0 is always the drawable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderPassPlan {
    pub label: &'static str,
    pub color: ColorAttachmentPlan,
}

/// A vertex buffer bound to a slot for the duration of the pass.
pub struct VertexBinding<'a, B> {
    pub slot: u32,
    pub buffer: &'a B,
}

/// One non-indexed draw.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub topology: wgpu::PrimitiveTopology,
    pub vertices: Range<u32>,
    pub instances: Range<u32>,
}

/// Everything one frame records: a single pass with a single draw.
///
/// Built by the renderer before submission and consumed by
/// [`GpuDevice::submit`](crate::device::GpuDevice::submit).
pub struct FramePlan<'a, B, P> {
    pub pass: RenderPassPlan,
    pub pipeline: &'a P,
    pub vertex_buffers: [VertexBinding<'a, B>; 2],
    pub draw: DrawCall,
}

/// Fixed-function inputs of the pipeline state.
#[derive(Debug, Clone)]
pub struct PipelineDesc<'a> {
    pub label: &'a str,
    /// Format of color attachment 0.
    pub color_format: wgpu::TextureFormat,
    /// Vertex streams in slot order.
    pub vertex_streams: &'a [VertexStream],
    pub topology: wgpu::PrimitiveTopology,
}
