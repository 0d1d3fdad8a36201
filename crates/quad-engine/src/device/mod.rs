//! GPU device + surface management.
//!
//! This module is responsible for:
//! - the traits the renderer is written against (`DeviceProvider`, `GpuDevice`, `PresentSurface`)
//! - the wgpu implementation: adapter/device/queue acquisition, pipelines, submission
//! - creating & configuring the window surface (swapchain)

mod api;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use api::{DeviceProvider, GpuDevice, PresentSurface};
pub use error::SetupError;
pub use frame::WgpuDrawable;
pub use gpu::{WgpuDevice, WgpuProvider};
pub use init::GpuInit;
pub use surface::WgpuSurface;
