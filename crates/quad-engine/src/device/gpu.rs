use wgpu::util::DeviceExt;

use crate::render::{CompiledShader, FramePlan, LoadAction, PipelineDesc, StoreAction};

use super::{DeviceProvider, GpuDevice, GpuInit, SetupError, WgpuDrawable};

/// Acquires the default wgpu adapter and its device/queue.
///
/// `compatible_surface` narrows the default adapter to one able to present to
/// the host surface; it does not enumerate alternatives.
pub struct WgpuProvider<'a, 'w> {
    instance: &'a wgpu::Instance,
    compatible_surface: Option<&'a wgpu::Surface<'w>>,
    init: &'a GpuInit,
}

impl<'a, 'w> WgpuProvider<'a, 'w> {
    pub fn new(
        instance: &'a wgpu::Instance,
        compatible_surface: Option<&'a wgpu::Surface<'w>>,
        init: &'a GpuInit,
    ) -> Self {
        Self {
            instance,
            compatible_surface,
            init,
        }
    }
}

impl DeviceProvider for WgpuProvider<'_, '_> {
    type Device = WgpuDevice;

    /// Adapter/device acquisition is asynchronous under wgpu; this blocks on it.
    fn default_device(&self) -> Result<WgpuDevice, SetupError> {
        let adapter = pollster::block_on(self.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: self.init.power_preference,
                compatible_surface: self.compatible_surface,
                force_fallback_adapter: false,
            },
        ))
        .map_err(|e| SetupError::NoAdapter(e.to_string()))?;

        let info = adapter.get_info();
        log::info!(
            "using adapter `{}` ({:?}, {:?})",
            info.name,
            info.device_type,
            info.backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("quad-engine device"),
            required_features: self.init.required_features,
            required_limits: self.init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| SetupError::DeviceRequest(e.to_string()))?;

        Ok(WgpuDevice {
            adapter,
            device,
            queue,
        })
    }
}

/// Owns the wgpu adapter, logical device and its command queue.
pub struct WgpuDevice {
    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,
}

impl WgpuDevice {
    /// Returns the adapter the device was created from.
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
}

impl GpuDevice for WgpuDevice {
    type Buffer = wgpu::Buffer;
    type Pipeline = wgpu::RenderPipeline;
    type Drawable = WgpuDrawable;

    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Result<wgpu::Buffer, SetupError> {
        Ok(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        }))
    }

    fn create_pipeline(
        &self,
        shader: &CompiledShader,
        desc: &PipelineDesc<'_>,
    ) -> Result<wgpu::RenderPipeline, SetupError> {
        let format_features = self.adapter.get_texture_format_features(desc.color_format);
        if !format_features
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        {
            return Err(SetupError::Pipeline(format!(
                "{:?} cannot be used as a color attachment",
                desc.color_format
            )));
        }

        // Buffer layouts are positional: stream N must live in slot N.
        if let Some((index, stream)) = desc
            .vertex_streams
            .iter()
            .enumerate()
            .find(|(i, s)| s.slot != *i as u32)
        {
            return Err(SetupError::Pipeline(format!(
                "vertex stream {index} declares slot {}",
                stream.slot
            )));
        }

        // Pipeline errors surface through the device, not the return value.
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.label()),
            source: wgpu::ShaderSource::Wgsl(shader.wgsl().into()),
        });

        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(desc.label),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

        let attributes: Vec<[wgpu::VertexAttribute; 1]> = desc
            .vertex_streams
            .iter()
            .map(|s| {
                [wgpu::VertexAttribute {
                    format: s.format,
                    offset: 0,
                    shader_location: s.location,
                }]
            })
            .collect();

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = desc
            .vertex_streams
            .iter()
            .zip(&attributes)
            .map(|(s, attrs)| wgpu::VertexBufferLayout {
                array_stride: s.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(shader.vertex_entry()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some(shader.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("device rejected pipeline `{}`: {err}", desc.label);
            return Err(SetupError::Pipeline(err.to_string()));
        }

        Ok(pipeline)
    }

    fn submit(
        &self,
        drawable: WgpuDrawable,
        plan: &FramePlan<'_, wgpu::Buffer, wgpu::RenderPipeline>,
    ) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quad frame encoder"),
            });

        // Pass borrows the encoder; dropped before finish().
        {
            let load = match plan.pass.color.load {
                LoadAction::Clear(c) => wgpu::LoadOp::Clear(wgpu::Color {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                    a: c.a,
                }),
                LoadAction::Load => wgpu::LoadOp::Load,
            };
            let store = match plan.pass.color.store {
                StoreAction::Store => wgpu::StoreOp::Store,
                StoreAction::Discard => wgpu::StoreOp::Discard,
            };

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(plan.pass.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &drawable.view,
                    resolve_target: None,
                    ops: wgpu::Operations { load, store },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(plan.pipeline);
            for binding in &plan.vertex_buffers {
                rpass.set_vertex_buffer(binding.slot, binding.buffer.slice(..));
            }
            rpass.draw(plan.draw.vertices.clone(), plan.draw.instances.clone());
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        drawable.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ShaderSource, POSITION_STREAM, UV_STREAM, VertexStream};

    /// Headless device, or `None` on machines without any adapter.
    fn headless_device() -> Option<WgpuDevice> {
        let init = GpuInit::default();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });
        WgpuProvider::new(&instance, None, &init).default_device().ok()
    }

    fn quad_desc(streams: &[VertexStream]) -> PipelineDesc<'_> {
        PipelineDesc {
            label: "test pipeline",
            color_format: wgpu::TextureFormat::Bgra8Unorm,
            vertex_streams: streams,
            topology: wgpu::PrimitiveTopology::TriangleList,
        }
    }

    #[test]
    fn quad_pipeline_builds_on_real_device() {
        let Some(device) = headless_device() else {
            return;
        };
        let shader = ShaderSource::QUAD.compile().unwrap();
        let streams = [POSITION_STREAM, UV_STREAM];
        assert!(device.create_pipeline(&shader, &quad_desc(&streams)).is_ok());
    }

    #[test]
    fn device_rejection_becomes_pipeline_error() {
        let Some(device) = headless_device() else {
            return;
        };
        let shader = ShaderSource::QUAD.compile().unwrap();
        // Integer stream feeding a float shader input.
        let streams = [
            POSITION_STREAM,
            VertexStream {
                format: wgpu::VertexFormat::Uint32x2,
                ..UV_STREAM
            },
        ];

        let err = device
            .create_pipeline(&shader, &quad_desc(&streams))
            .unwrap_err();
        assert!(matches!(err, SetupError::Pipeline(_)), "{err:?}");
    }

    #[test]
    fn misordered_slots_are_rejected_before_the_device() {
        let Some(device) = headless_device() else {
            return;
        };
        let shader = ShaderSource::QUAD.compile().unwrap();
        let streams = [UV_STREAM, POSITION_STREAM];

        let err = device
            .create_pipeline(&shader, &quad_desc(&streams))
            .unwrap_err();
        assert!(matches!(err, SetupError::Pipeline(_)), "{err:?}");
    }
}
