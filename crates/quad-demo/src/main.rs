use anyhow::Result;

use quad_engine::core::AppContext;
use quad_engine::device::GpuInit;
use quad_engine::logging::{init_logging, LoggingConfig};
use quad_engine::render::RendererConfig;
use quad_engine::window::Runtime;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let ctx = AppContext::new(process_name());
    log::info!("starting {}", ctx.app_name);

    Runtime::run(ctx, GpuInit::default(), RendererConfig::default())
}

/// Executable file stem, used to name the application menu.
fn process_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
