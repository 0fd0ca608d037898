//! Nebula Player - procedural galaxy viewer
//!
//! Usage:
//!   nebula-player [--config <galaxy.toml>] [--count <n>] [--seed <n>] [--fullscreen]

use anyhow::{Context, Result};
use clap::Parser;
use nebula_player::GalaxyApp;
use nebula_runtime::ViewConfig;
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "nebula-player")]
#[command(about = "Nebula - animated procedural galaxy viewer")]
struct Args {
    /// Path to a TOML view configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of galaxy points
    #[arg(long)]
    count: Option<u32>,

    /// Seed the generator for a reproducible galaxy
    #[arg(long)]
    seed: Option<u64>,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewConfig::load(path).context("Failed to load view configuration")?,
        None => ViewConfig::default(),
    };
    if let Some(count) = args.count {
        config.galaxy.count = count;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.window.fullscreen |= args.fullscreen;
    config.validate().context("Invalid view configuration")?;

    log::info!(
        "[player] {} points, {} branches, radius {}",
        config.galaxy.count,
        config.galaxy.branches,
        config.galaxy.radius
    );
    log::info!("[player] controls: left drag orbit, right drag pan, wheel zoom, R regenerate, Esc quit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GalaxyApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
