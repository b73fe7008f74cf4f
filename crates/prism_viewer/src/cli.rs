use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use prism_renderer::LightingMode;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

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

/// Lighting modes as spelled on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    ObservedArea,
    Radiance,
    Brdf,
    Combined,
}

impl From<Mode> for LightingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::ObservedArea => LightingMode::ObservedArea,
            Mode::Radiance => LightingMode::Radiance,
            Mode::Brdf => LightingMode::Brdf,
            Mode::Combined => LightingMode::Combined,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "prism")]
#[command(about = "Render a scene with the Prism direct-lighting ray tracer")]
pub struct Args {
    /// Scene description (JSON). Renders the built-in reference scene when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value = "640")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "480")]
    pub height: u32,

    /// Lighting mode
    #[arg(short, long, value_enum, default_value = "combined")]
    pub mode: Mode,

    /// Disable shadow rays
    #[arg(long)]
    pub no_shadows: bool,

    /// Render one image per lighting mode, in cycling order
    #[arg(long)]
    pub all_modes: bool,

    /// Output image; the format follows the extension (.png, .bmp, ...)
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
