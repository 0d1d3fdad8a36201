//! Recording GPU backend for renderer tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::device::{DeviceProvider, GpuDevice, PresentSurface, SetupError};
use crate::render::{CompiledShader, DrawCall, FramePlan, PipelineDesc, RenderPassPlan, VertexStream};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct BufferId(pub usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct PipelineId(pub usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct DrawableId(pub u32);

#[derive(Debug, Clone)]
pub(crate) struct RecordedBuffer {
    pub label: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedPipeline {
    pub color_format: wgpu::TextureFormat,
    pub vertex_streams: Vec<VertexStream>,
    pub topology: wgpu::PrimitiveTopology,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedFrame {
    pub drawable: DrawableId,
    pub pass: RenderPassPlan,
    pub pipeline: PipelineId,
    pub bindings: Vec<(u32, BufferId)>,
    pub draw: DrawCall,
}

/// Everything the fake device was asked to do.
#[derive(Debug, Default)]
pub(crate) struct GpuLog {
    pub buffers: Vec<RecordedBuffer>,
    pub pipelines: Vec<RecordedPipeline>,
    pub submissions: Vec<RecordedFrame>,
}

pub(crate) type SharedLog = Rc<RefCell<GpuLog>>;

pub(crate) struct FakeProvider {
    pub log: SharedLog,
    pub has_device: bool,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            log: SharedLog::default(),
            has_device: true,
        }
    }

    pub fn without_device() -> Self {
        Self {
            has_device: false,
            ..Self::new()
        }
    }
}

impl DeviceProvider for FakeProvider {
    type Device = FakeDevice;

    fn default_device(&self) -> Result<FakeDevice, SetupError> {
        if !self.has_device {
            return Err(SetupError::NoAdapter("no adapter in test".into()));
        }
        Ok(FakeDevice {
            log: Rc::clone(&self.log),
        })
    }
}

pub(crate) struct FakeDevice {
    log: SharedLog,
}

impl GpuDevice for FakeDevice {
    type Buffer = BufferId;
    type Pipeline = PipelineId;
    type Drawable = DrawableId;

    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Result<BufferId, SetupError> {
        let mut log = self.log.borrow_mut();
        log.buffers.push(RecordedBuffer {
            label: label.to_string(),
            contents: contents.to_vec(),
        });
        Ok(BufferId(log.buffers.len() - 1))
    }

    fn create_pipeline(
        &self,
        shader: &CompiledShader,
        desc: &PipelineDesc<'_>,
    ) -> Result<PipelineId, SetupError> {
        let mut log = self.log.borrow_mut();
        log.pipelines.push(RecordedPipeline {
            color_format: desc.color_format,
            vertex_streams: desc.vertex_streams.to_vec(),
            topology: desc.topology,
            vertex_entry: shader.vertex_entry(),
            fragment_entry: shader.fragment_entry(),
        });
        Ok(PipelineId(log.pipelines.len() - 1))
    }

    fn submit(&self, drawable: DrawableId, plan: &FramePlan<'_, BufferId, PipelineId>) {
        self.log.borrow_mut().submissions.push(RecordedFrame {
            drawable,
            pass: plan.pass,
            pipeline: *plan.pipeline,
            bindings: plan
                .vertex_buffers
                .iter()
                .map(|b| (b.slot, *b.buffer))
                .collect(),
            draw: plan.draw.clone(),
        });
    }
}

/// Surface whose drawable availability is scripted per frame.
///
/// Once the script runs out, every frame gets a drawable.
#[derive(Default)]
pub(crate) struct FakeSurface {
    pub script: VecDeque<bool>,
    pub attach_calls: usize,
    next_id: u32,
}

impl FakeSurface {
    pub fn busy_for(frames: usize) -> Self {
        Self {
            script: std::iter::repeat_n(false, frames).collect(),
            ..Self::default()
        }
    }
}

impl PresentSurface<FakeDevice> for FakeSurface {
    fn attach(&mut self, _device: &FakeDevice) {
        self.attach_calls += 1;
    }

    fn next_drawable(&mut self) -> Option<DrawableId> {
        if !self.script.pop_front().unwrap_or(true) {
            return None;
        }
        let id = DrawableId(self.next_id);
        self.next_id += 1;
        Some(id)
    }
}
