//! Quad engine crate.
//!
//! A minimal wgpu pipeline: one window, one surface, one renderer drawing a
//! static textured quad every frame.

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
