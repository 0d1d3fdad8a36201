use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, ModifiersState};
use winit::window::{Window, WindowId};

use crate::core::{AppContext, MenuAction, ShortcutModifiers, SurfaceDelegate};
use crate::device::{GpuInit, WgpuDevice, WgpuProvider, WgpuSurface};
use crate::render::{FrameOutcome, Renderer, RendererConfig};
use crate::time::FramePacer;

/// Entry point for the surface host.
pub struct Runtime;

impl Runtime {
    /// Opens the window, sets up the renderer and drives it until quit.
    ///
    /// Returns the setup error if the render pipeline could not be built.
    pub fn run(ctx: AppContext, gpu_init: GpuInit, renderer_config: RendererConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        for item in &ctx.menu.items {
            match item.shortcut {
                Some(s) => log::info!("menu `{}`: {} ({s})", ctx.menu.title, item.title),
                None => log::info!("menu `{}`: {}", ctx.menu.title, item.title),
            }
        }

        let mut state = HostState::new(ctx, gpu_init, renderer_config);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.fatal.take() {
            return Err(err);
        }

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    surface: WgpuSurface<'this>,
}

/// The window, its surface and the renderer drawing into it.
struct ActiveWindow {
    entry: WindowEntry,
    renderer: Renderer<WgpuDevice>,
}

impl ActiveWindow {
    fn id(&self) -> WindowId {
        self.entry.with_window(|w| w.id())
    }

    fn request_redraw(&self) {
        self.entry.with_window(|w| w.request_redraw());
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let renderer = &mut self.renderer;
        self.entry.with_surface_mut(|surface| {
            surface.resize(new_size);
            <Renderer<WgpuDevice> as SurfaceDelegate<WgpuSurface<'_>>>::on_surface_resize(
                renderer, new_size,
            );
        });
    }

    fn draw(&mut self) -> FrameOutcome {
        let renderer = &mut self.renderer;
        self.entry.with_mut(|fields| {
            fields.window.pre_present_notify();
            renderer.on_frame_tick(fields.surface)
        })
    }
}

struct HostState {
    ctx: AppContext,
    gpu_init: GpuInit,
    renderer_config: RendererConfig,

    instance: wgpu::Instance,
    active: Option<ActiveWindow>,

    pacer: FramePacer,
    redraw_pending: bool,
    modifiers: ShortcutModifiers,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl HostState {
    fn new(ctx: AppContext, gpu_init: GpuInit, renderer_config: RendererConfig) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: gpu_init.backends,
            ..Default::default()
        });
        let pacer = FramePacer::new(ctx.frames_per_second, Instant::now());

        Self {
            ctx,
            gpu_init,
            renderer_config,
            instance,
            active: None,
            pacer,
            redraw_pending: false,
            modifiers: ShortcutModifiers::default(),
            fatal: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Builds window, surface and renderer; all of them or none.
    fn create_active_window(&self, event_loop: &ActiveEventLoop) -> Result<ActiveWindow> {
        let config = &self.ctx.window;
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size)
            .with_position(config.position)
            .with_resizable(config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let instance = &self.instance;
        let gpu_init = &self.gpu_init;

        let mut entry = WindowEntryTryBuilder {
            window,
            surface_builder: |w| WgpuSurface::new(instance, w, gpu_init),
        }
        .try_build()
        .context("surface setup failed")?;

        let renderer = entry
            .with_surface(|surface| {
                let provider = WgpuProvider::new(instance, Some(surface.raw()), gpu_init);
                Renderer::new(&provider, &self.renderer_config)
            })
            .context("renderer setup failed")?;

        entry
            .with_surface_mut(|surface| surface.prepare(renderer.device(), renderer.color_format()))
            .context("surface configuration failed")?;

        Ok(ActiveWindow { entry, renderer })
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: &Key) {
        let Key::Character(text) = key else {
            return;
        };
        if self.ctx.menu.action_for(text.as_str(), self.modifiers) == Some(MenuAction::Quit) {
            log::info!("quit requested");
            self.request_exit(event_loop);
        }
    }
}

impl ApplicationHandler for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.is_some() || self.exit_requested {
            return;
        }

        match self.create_active_window(event_loop) {
            Ok(active) => {
                active.entry.with_window(|w| w.focus_window());
                active.request_redraw();
                self.redraw_pending = true;
                self.active = Some(active);
            }
            Err(e) => {
                log::error!("fatal setup error: {e:#}");
                self.fatal = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(active) = self.active.as_ref() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        if self.redraw_pending {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        if self.pacer.is_due(Instant::now()) {
            active.request_redraw();
            self.redraw_pending = true;
            event_loop.set_control_flow(ControlFlow::Wait);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.pacer.next_deadline()));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                // Last (only) window closed: terminate.
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                active.resize(new_size);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = active.entry.with_window(|w| w.inner_size());
                active.resize(new_size);
            }

            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = map_modifiers(m.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    self.handle_key(event_loop, &event.logical_key);
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw_pending = false;
                let ft = self.pacer.tick(Instant::now());

                if active.draw() == FrameOutcome::Skipped {
                    log::trace!(
                        "frame {} skipped ({:.1} ms since previous tick)",
                        ft.frame_index,
                        ft.dt * 1000.0
                    );
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(active) = self.active.take() {
            let stats = active.renderer.stats();
            log::info!(
                "shutting down: {} frames presented, {} dropped",
                stats.presented,
                stats.skipped
            );
        }
    }
}

fn map_modifiers(m: ModifiersState) -> ShortcutModifiers {
    ShortcutModifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}
