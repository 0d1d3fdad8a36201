//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (surface host) and
//! the renderer, plus the application-level context the composition root owns.

mod app;
mod ctx;
mod menu;

pub use app::SurfaceDelegate;
pub use ctx::{AppContext, WindowConfig};
pub use menu::{AppMenu, MenuAction, MenuItem, Shortcut, ShortcutModifiers};
