//! Time subsystem.
//!
//! Provides testable frame pacing without coupling to the runtime.
//! Intended usage:
//! - one `FramePacer` per render loop
//! - wait until `next_deadline()`, then call `tick()` once per drawn frame

mod frame_clock;

pub use frame_clock::{FramePacer, FrameTime};
