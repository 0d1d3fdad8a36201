use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::{GpuInit, PresentSurface, SetupError, WgpuDevice, WgpuDrawable};

/// Window-bound presentation surface (swapchain).
///
/// Surface lifetime is tied to the window; the host must ensure the window
/// outlives this value.
pub struct WgpuSurface<'w> {
    surface: wgpu::Surface<'w>,

    /// Set by [`WgpuSurface::prepare`]; `None` until then.
    config: Option<wgpu::SurfaceConfiguration>,

    state: SwapchainState,

    present_mode: wgpu::PresentMode,
    alpha_mode: Option<wgpu::CompositeAlphaMode>,
    desired_maximum_frame_latency: u32,
}

impl<'w> WgpuSurface<'w> {
    /// Creates an unconfigured surface for `window`.
    pub fn new(
        instance: &wgpu::Instance,
        window: &'w Window,
        init: &GpuInit,
    ) -> Result<Self, SetupError> {
        let surface = instance
            .create_surface(window)
            .map_err(|e| SetupError::SurfaceCreation(e.to_string()))?;

        Ok(Self {
            surface,
            config: None,
            state: SwapchainState::new(window.inner_size()),
            present_mode: init.present_mode,
            alpha_mode: init.alpha_mode,
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        })
    }

    /// Returns the underlying wgpu surface.
    pub fn raw(&self) -> &wgpu::Surface<'w> {
        &self.surface
    }

    /// Checks that the surface accepts `format` and configures it for `device`.
    pub fn prepare(
        &mut self,
        device: &WgpuDevice,
        format: wgpu::TextureFormat,
    ) -> Result<(), SetupError> {
        let caps = self.surface.get_capabilities(device.adapter());
        if !caps.formats.contains(&format) {
            log::error!("surface formats: {:?}", caps.formats);
            return Err(SetupError::UnsupportedSurfaceFormat { requested: format });
        }

        let present_mode = if caps.present_modes.contains(&self.present_mode) {
            self.present_mode
        } else {
            log::warn!(
                "{:?} unsupported by surface; falling back to Fifo",
                self.present_mode
            );
            wgpu::PresentMode::Fifo
        };

        let size = self.state.size();
        self.config = Some(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: choose_alpha_mode(&caps, self.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: self.desired_maximum_frame_latency,
        });
        self.state.invalidate();
        self.attach(device);

        Ok(())
    }

    /// Records a new drawable size; the swapchain is rebuilt on the next attach.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.state.resize(new_size);
    }
}

impl PresentSurface<WgpuDevice> for WgpuSurface<'_> {
    fn attach(&mut self, device: &WgpuDevice) {
        let Some(config) = self.config.as_mut() else {
            return;
        };
        let Some(size) = self.state.pending_configure() else {
            return;
        };

        config.width = size.width;
        config.height = size.height;
        self.surface.configure(device.device(), config);
        self.state.configured();
    }

    fn next_drawable(&mut self) -> Option<WgpuDrawable> {
        if self.config.is_none() || !self.state.can_acquire() {
            return None;
        }

        match self.surface.get_current_texture() {
            Ok(surface_texture) => {
                if surface_texture.suboptimal {
                    self.state.invalidate();
                }
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                Some(WgpuDrawable {
                    surface_texture,
                    view,
                })
            }
            Err(err) => {
                match self.state.acquire_failed(&err) {
                    SurfaceErrorAction::Reconfigure => log::debug!("{err}; reconfiguring"),
                    SurfaceErrorAction::OutOfMemory => {
                        log::error!("surface out of memory; frame dropped")
                    }
                    SurfaceErrorAction::SkipFrame => log::debug!("no drawable this frame: {err}"),
                }
                None
            }
        }
    }
}

/// Response to a failed drawable acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum SurfaceErrorAction {
    /// Swapchain must be rebuilt before the next acquisition.
    Reconfigure,
    /// Transient; try again next frame.
    SkipFrame,
    OutOfMemory,
}

pub(crate) fn map_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::OutOfMemory,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

/// Whether the swapchain configuration still matches the drawable size.
///
/// wgpu cannot configure a 0x0 surface; at zero size configuration is
/// deferred and the state stays stale.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct SwapchainState {
    size: PhysicalSize<u32>,
    stale: bool,
}

impl SwapchainState {
    pub(crate) fn new(size: PhysicalSize<u32>) -> Self {
        Self { size, stale: true }
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size != self.size {
            self.size = new_size;
            self.stale = true;
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Size to configure the swapchain with, if a reconfigure is due now.
    pub(crate) fn pending_configure(&self) -> Option<PhysicalSize<u32>> {
        let has_area = self.size.width > 0 && self.size.height > 0;
        (self.stale && has_area).then_some(self.size)
    }

    pub(crate) fn configured(&mut self) {
        self.stale = false;
    }

    pub(crate) fn can_acquire(&self) -> bool {
        !self.stale
    }

    pub(crate) fn acquire_failed(&mut self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = map_surface_error(err);
        if action == SurfaceErrorAction::Reconfigure {
            self.stale = true;
        }
        action
    }
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}
