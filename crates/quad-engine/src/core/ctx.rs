use winit::dpi::{LogicalPosition, LogicalSize};

use super::AppMenu;

/// Top-level window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub position: LogicalPosition<f64>,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Metal API Demo".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            position: LogicalPosition::new(100.0, 100.0),
            resizable: false,
        }
    }
}

/// Application-level state owned by the composition root.
///
/// Moved into the runtime at startup. The renderer never sees it.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub app_name: String,
    pub window: WindowConfig,
    pub menu: AppMenu,
    /// Target frame tick rate.
    pub frames_per_second: u32,
}

impl AppContext {
    /// Standard context: default window, a Quit-only menu, 60 Hz ticks.
    pub fn new(app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        Self {
            menu: AppMenu::standard(&app_name),
            app_name,
            window: WindowConfig::default(),
            frames_per_second: 60,
        }
    }
}
