mod app;
mod audio;
mod calibrate;
mod color;
mod config;
mod constants;
mod error;
mod level;
mod pipeline;
mod smoothing;
mod ui;

use clap::Parser;
use cpal::traits::{DeviceTrait, HostTrait};
use dialoguer::{Select, theme::ColorfulTheme};

fn list_devices() -> Result<(), Box<dyn std::error::Error>> {
    let host = cpal::default_host();
    let devices = host.input_devices()?;

    let device_list: Vec<String> = devices.filter_map(|d| d.name().ok()).collect();

    if device_list.is_empty() {
        println!("No audio input devices found.");
        return Ok(());
    }

    // Interactive selection
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select an audio input device")
        .items(&device_list)
        .default(0)
        .interact()?;

    println!("{}", device_list[selection]);

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    use config::{Args, Commands};

    let args = Args::parse();

    match args.command {
        Commands::Run(run_args) => {
            // Create config from run args
            let config = match config::Config::from_run_args(&run_args) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    std::process::exit(2);
                }
            };

            match app::App::new_with_config(config) {
                Ok(app) => {
                    if let Err(e) = app.run().await {
                        eprintln!("Application error: {}", e);
                        std::process::exit(2);
                    }
                }
                Err(e) => {
                    eprintln!("Setup error: {}", e);
                    std::process::exit(2);
                }
            }
        }
        Commands::List(_) => {
            if let Err(e) = list_devices() {
                eprintln!("Error listing devices: {}", e);
                std::process::exit(2);
            }
        }
    }
}
