use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser, Debug)]
#[command(name = "phongtrace")]
#[command(about = "Sphere ray tracer with Blinn-Phong shading, shadows and mirror reflections")]
pub struct Args {
    /// JSON scene description; renders the built-in demo scene when omitted
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "800")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600")]
    pub height: u32,

    /// Rays per pixel; values above 1 jitter rays for anti-aliasing
    #[arg(long, short = 's', default_value = "1")]
    pub samples_per_pixel: u32,

    /// Reflection bounce limit, overriding the scene's value
    #[arg(long, short = 'b')]
    pub bounces: Option<u32>,

    /// Worker threads for rendering (0 uses one per logical core)
    #[arg(long, default_value = "0")]
    pub threads: usize,

    /// Output file path (.png for 8-bit sRGB, .exr for linear HDR)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Send image to TEV for real-time visualization
    #[arg(long)]
    pub tev: bool,

    /// TEV address as host or host:port (automatically enables --tev)
    #[arg(long)]
    pub tev_address: Option<String>,
}
