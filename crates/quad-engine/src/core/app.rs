use winit::dpi::PhysicalSize;

use crate::render::FrameOutcome;

/// Callbacks the surface host drives.
///
/// `S` is the concrete presentation surface the host owns and lends out for
/// the duration of one tick. The host guarantees single-threaded re-entry:
/// ticks never overlap.
pub trait SurfaceDelegate<S> {
    /// Called when the drawable size changes.
    fn on_surface_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called once per frame tick.
    fn on_frame_tick(&mut self, surface: &mut S) -> FrameOutcome;
}
