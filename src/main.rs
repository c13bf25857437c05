mod audio;
mod cli;
mod config;
mod consts;
mod controller;
mod gui;
mod visual;

use audio::AudioAnalyzer;
use clap::Parser;
use log::{debug, info};
use std::sync::{Arc, Mutex};

use crate::config::VisualizerConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    info!("Starting up...");

    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            VisualizerConfig::load(path)?
        }
        None => VisualizerConfig::default(),
    };

    // === Shared State ===
    // Written by the input stream callback, read once per frame by the GUI tick.
    let analyzer = Arc::new(Mutex::new(AudioAnalyzer::new()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([500.0, 800.0])
            .with_title("SoundVisual Controller"),
        ..Default::default()
    };

    debug!("Launching GUI...");
    eframe::run_native(
        "SoundVisual audio visualizer",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(gui::AppState::new(config, args.device, analyzer)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("GUI exited with an error: {err}"))?;

    info!("Clean shutdown complete");
    Ok(())
}
