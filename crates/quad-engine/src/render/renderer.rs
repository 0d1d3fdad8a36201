use winit::dpi::PhysicalSize;

use crate::core::SurfaceDelegate;
use crate::device::{DeviceProvider, GpuDevice, PresentSurface, SetupError};

use super::{
    ClearColor, ColorAttachmentPlan, DrawCall, FramePlan, LoadAction, PipelineDesc, QuadGeometry,
    RenderPassPlan, ShaderSource, StoreAction, VertexBinding, POSITION_STREAM, UV_STREAM,
};

const QUAD_TOPOLOGY: wgpu::PrimitiveTopology = wgpu::PrimitiveTopology::TriangleList;

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Format of color attachment 0. The host surface must accept it.
    pub color_format: wgpu::TextureFormat,
    pub geometry: QuadGeometry,
    pub shader: ShaderSource,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            color_format: wgpu::TextureFormat::Bgra8Unorm,
            geometry: QuadGeometry::full_viewport(),
            shader: ShaderSource::QUAD,
        }
    }
}

impl RendererConfig {
    /// Replaces the quad geometry; the arrays must be parallel and six long.
    pub fn with_geometry(
        mut self,
        positions: Vec<[f32; 4]>,
        uvs: Vec<[f32; 2]>,
    ) -> Result<Self, SetupError> {
        self.geometry = QuadGeometry::new(positions, uvs)?;
        Ok(self)
    }
}

/// Result of one frame tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// One command buffer was submitted and the drawable presented.
    Presented,
    /// No drawable was available; nothing was recorded.
    Skipped,
}

/// Frame counters since construction.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct FrameStats {
    pub presented: u64,
    pub skipped: u64,
}

/// Draws the static quad.
///
/// A `Renderer` only exists once setup fully succeeded: device, both vertex
/// buffers and the pipeline state are immutable from then on and shared by
/// every frame.
pub struct Renderer<D: GpuDevice> {
    device: D,
    positions: D::Buffer,
    uvs: D::Buffer,
    pipeline: D::Pipeline,
    color_format: wgpu::TextureFormat,
    vertex_count: u32,
    stats: FrameStats,
}

impl<D: GpuDevice> Renderer<D> {
    /// Runs the whole setup sequence.
    ///
    /// The shader is validated first so a broken program fails before any
    /// GPU resource exists. Any error aborts setup; no partially built
    /// renderer is ever returned.
    pub fn new<P>(provider: &P, config: &RendererConfig) -> Result<Self, SetupError>
    where
        P: DeviceProvider<Device = D>,
    {
        let shader = config.shader.compile()?;

        let device = provider.default_device()?;

        let geometry = &config.geometry;
        let positions = device.create_vertex_buffer("quad positions", geometry.position_bytes())?;
        let uvs = device.create_vertex_buffer("quad uvs", geometry.uv_bytes())?;

        let pipeline = device.create_pipeline(
            &shader,
            &PipelineDesc {
                label: "quad pipeline",
                color_format: config.color_format,
                vertex_streams: &[POSITION_STREAM, UV_STREAM],
                topology: QUAD_TOPOLOGY,
            },
        )?;

        log::info!(
            "renderer ready ({} vertices, {:?})",
            geometry.vertex_count(),
            config.color_format
        );

        Ok(Self {
            device,
            positions,
            uvs,
            pipeline,
            color_format: config.color_format,
            vertex_count: geometry.vertex_count(),
            stats: FrameStats::default(),
        })
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Color format the pipeline was built for.
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Describes the work every frame records.
    ///
    /// Independent of surface size and frame index.
    pub fn frame_plan(&self) -> FramePlan<'_, D::Buffer, D::Pipeline> {
        FramePlan {
            pass: RenderPassPlan {
                label: "quad pass",
                color: ColorAttachmentPlan {
                    load: LoadAction::Clear(ClearColor::OPAQUE_BLACK),
                    store: StoreAction::Store,
                },
            },
            pipeline: &self.pipeline,
            vertex_buffers: [
                VertexBinding {
                    slot: POSITION_STREAM.slot,
                    buffer: &self.positions,
                },
                VertexBinding {
                    slot: UV_STREAM.slot,
                    buffer: &self.uvs,
                },
            ],
            draw: DrawCall {
                topology: QUAD_TOPOLOGY,
                vertices: 0..self.vertex_count,
                instances: 0..1,
            },
        }
    }

    /// Renders one frame into the next drawable of `surface`.
    ///
    /// A busy surface is not an error: the frame is skipped without recording
    /// or submitting anything.
    pub fn draw<S>(&mut self, surface: &mut S) -> FrameOutcome
    where
        S: PresentSurface<D>,
    {
        surface.attach(&self.device);

        let Some(drawable) = surface.next_drawable() else {
            self.stats.skipped += 1;
            log::trace!("no drawable available; frame skipped");
            return FrameOutcome::Skipped;
        };

        let plan = self.frame_plan();
        self.device.submit(drawable, &plan);

        self.stats.presented += 1;
        FrameOutcome::Presented
    }
}

impl<D, S> SurfaceDelegate<S> for Renderer<D>
where
    D: GpuDevice,
    S: PresentSurface<D>,
{
    /// Geometry is in clip space, so the surface size never matters.
    fn on_surface_resize(&mut self, size: PhysicalSize<u32>) {
        log::debug!("surface resized to {}x{}", size.width, size.height);
    }

    fn on_frame_tick(&mut self, surface: &mut S) -> FrameOutcome {
        self.draw(surface)
    }
}
