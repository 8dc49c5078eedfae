//! remotepad: a window that works as a touchpad for a remote machine.
//!
//! Startup order matters: logging first, then config, then the
//! connection task (needs a tokio runtime), then the winit event loop
//! on the main thread.

mod app;
mod cli;
mod fingers;

use std::path::Path;

use remotepad_core::{ConnectionManager, PadConfig};
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("remotepad v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load config
    let mut config = match args.config {
        Some(ref path) => {
            tracing::info!("Using config override: {path}");
            remotepad_core::config::load_from_path(Path::new(path))
        }
        None => remotepad_core::config::load_default(),
    }
    .unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        PadConfig::default()
    });

    if let Some(server) = args.server {
        config.server.origin = server;
    }
    tracing::info!("Config loaded (server: {})", config.server.origin);

    // The connection task lives on the tokio runtime; winit keeps the
    // main thread for itself.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    let (manager, status_rx) = {
        let _guard = runtime.enter();
        ConnectionManager::connect(&config.server)
    };

    // Create event loop and run
    let event_loop = EventLoop::new().expect("failed to create event loop");
    let mut app = app::PadApp::new(manager, status_rx);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
