use crate::render::{CompiledShader, FramePlan, PipelineDesc};

use super::SetupError;

/// Source of the default GPU device.
///
/// Acquisition happens exactly once per renderer. No fallback enumeration is
/// attempted: an implementation either returns the default device or fails.
pub trait DeviceProvider {
    type Device: GpuDevice;

    fn default_device(&self) -> Result<Self::Device, SetupError>;
}

/// The subset of a GPU API the renderer consumes.
///
/// All resources are created through the device. `submit` records one frame
/// described by a [`FramePlan`], submits it to the device queue and presents
/// the drawable.
pub trait GpuDevice {
    /// Immutable vertex buffer handle.
    type Buffer;

    /// Compiled pipeline state handle.
    type Pipeline;

    /// One acquired back-buffer, owned by a single draw call.
    type Drawable;

    /// Creates a vertex buffer initialized with `contents`.
    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Result<Self::Buffer, SetupError>;

    /// Builds pipeline state from a validated shader.
    fn create_pipeline(
        &self,
        shader: &CompiledShader,
        desc: &PipelineDesc<'_>,
    ) -> Result<Self::Pipeline, SetupError>;

    /// Records, submits and presents one frame.
    fn submit(&self, drawable: Self::Drawable, plan: &FramePlan<'_, Self::Buffer, Self::Pipeline>);
}

/// Presentation surface owned by the host.
///
/// The host constructs the concrete surface and hands it to the renderer on
/// every tick, so no runtime type inspection is needed.
pub trait PresentSurface<D: GpuDevice> {
    /// Binds `device` to the surface. Must be cheap and idempotent.
    fn attach(&mut self, device: &D);

    /// Returns the next available drawable, or `None` when the surface is busy.
    fn next_drawable(&mut self) -> Option<D::Drawable>;
}
