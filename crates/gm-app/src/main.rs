//! Main application entry point

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod bridge;
mod config;

use app::ExplorerApp;
use config::{AppConfig, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = AppConfig::resolve(&args).map_err(|e| {
        error!("{:#}", e);
        e
    })?;
    info!("Starting Game Market Explorer");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("gm-worker")
        .build()
        .context("Failed to start async runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Game Market Explorer",
        options,
        Box::new(move |cc| Box::new(ExplorerApp::new(cc, config, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
