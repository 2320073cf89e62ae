//! Configuration parsing and validation

use clap::{Parser, Subcommand, ValueEnum};

use crate::color::Rgb;
use crate::constants::{color, tuning};
use crate::error::{AppError, AppResult};
use crate::pipeline::Tuning;

/// Command line arguments for the soundhue application
#[derive(Parser)]
#[command(name = "soundhue")]
#[command(about = "Audio-reactive terminal color display")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture microphone input and paint the terminal with it
    Run(RunArgs),
    /// List available audio input devices
    List(ListArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Input sensitivity (1-18)
    #[arg(long, default_value_t = tuning::DEFAULT_SENSITIVITY)]
    pub sensitivity: f32,

    /// Transition smoothing (1-12); larger values mean slower transitions
    #[arg(long, default_value_t = tuning::DEFAULT_SMOOTHING)]
    pub smoothing: f32,

    /// Smoothing strategy
    #[arg(long, value_enum, default_value = "exp")]
    pub smoother: SmootherKind,

    /// Audio input device name (optional, uses default if not specified)
    #[arg(long)]
    pub device: Option<String>,

    /// Background color at silence, as RRGGBB hex
    #[arg(long)]
    pub min_color: Option<String>,

    /// Background color at full intensity, as RRGGBB hex
    #[arg(long)]
    pub max_color: Option<String>,
}

#[derive(Parser)]
pub struct ListArgs {}

/// Smoothing strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SmootherKind {
    /// Exponential approach toward the target
    Exp,
    /// Moving average over recent targets
    Average,
}

/// Application configuration derived from command line arguments
pub struct Config {
    pub tuning: Tuning,
    pub smoother: SmootherKind,
    pub device_name: Option<String>,
    pub min_color: Rgb,
    pub max_color: Rgb,
}

impl Config {
    /// Create configuration from run arguments
    pub fn from_run_args(run_args: &RunArgs) -> AppResult<Self> {
        // Validate sensitivity range
        if run_args.sensitivity < tuning::SENSITIVITY_MIN
            || run_args.sensitivity > tuning::SENSITIVITY_MAX
        {
            return Err(AppError::Config(format!(
                "Sensitivity must be between {} and {}, got {}",
                tuning::SENSITIVITY_MIN,
                tuning::SENSITIVITY_MAX,
                run_args.sensitivity
            )));
        }

        // Validate smoothing range; the floor of 1 guards the pipeline divisions
        if run_args.smoothing < tuning::SMOOTHING_MIN || run_args.smoothing > tuning::SMOOTHING_MAX
        {
            return Err(AppError::Config(format!(
                "Smoothing must be between {} and {}, got {}",
                tuning::SMOOTHING_MIN,
                tuning::SMOOTHING_MAX,
                run_args.smoothing
            )));
        }

        let min_color = match &run_args.min_color {
            Some(hex) => hex.parse()?,
            None => color::MIN_COLOR,
        };
        let max_color = match &run_args.max_color {
            Some(hex) => hex.parse()?,
            None => color::MAX_COLOR,
        };

        Ok(Config {
            tuning: Tuning {
                sensitivity: run_args.sensitivity,
                smoothing: run_args.smoothing,
            },
            smoother: run_args.smoother,
            device_name: run_args.device.clone(),
            min_color,
            max_color,
        })
    }
}
