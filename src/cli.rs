use clap::Parser;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "soundvisual")]
#[command(about = "Audio-reactive visualizer", long_about = None)]
pub struct Args {
    /// TOML file with visualizer settings. Missing keys keep their defaults.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name of the input device to listen to (defaults to the host's default input)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,
}
