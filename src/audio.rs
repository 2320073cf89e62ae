//! Audio device handling and stream processing

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait};
use log::{debug, error};

use crate::error::{AppError, AppResult};
use crate::level::{self, LevelSlot};

/// Audio configuration and device information
pub struct AudioConfig {
    pub device_name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Find and configure an audio input device
pub fn setup_audio_device(device_name: Option<String>) -> AppResult<(cpal::Device, AudioConfig)> {
    let host = cpal::default_host();

    // Get input device
    let device = if let Some(name) = device_name {
        host.input_devices()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| AppError::AudioDevice("Specified device not found".to_string()))?
    } else {
        host.default_input_device()
            .ok_or_else(|| AppError::AudioDevice("No default input device available".to_string()))?
    };

    let device_name = device.name()?;

    // Get supported input configs and determine sample rate from device
    let mut supported_configs = device.supported_input_configs()?;
    let config_range = supported_configs
        .next()
        .ok_or_else(|| AppError::AudioDevice("No supported input configs found".to_string()))?;

    // Prefer 44.1kHz if supported, otherwise fall back to the minimum rate
    let sample_rate =
        if config_range.min_sample_rate().0 <= 44100 && config_range.max_sample_rate().0 >= 44100 {
            44100
        } else {
            config_range.min_sample_rate().0
        };

    // Mono capture where the device allows it
    let channels = if config_range.channels() >= crate::constants::audio::DEFAULT_CHANNELS {
        crate::constants::audio::DEFAULT_CHANNELS
    } else {
        config_range.channels()
    };

    debug!(
        "using input device '{}' at {} Hz, {} channel(s)",
        device_name, sample_rate, channels
    );

    let audio_config = AudioConfig {
        device_name,
        sample_rate,
        channels,
    };

    Ok((device, audio_config))
}

/// Build an audio input stream with the given callback
pub fn build_audio_stream<F>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    data_callback: F,
) -> AppResult<cpal::Stream>
where
    F: FnMut(&[f32], &cpal::InputCallbackInfo) + Send + 'static,
{
    let stream = device.build_input_stream(
        config,
        data_callback,
        |err| error!("audio stream error: {}", err),
        None,
    )?;

    Ok(stream)
}

/// Audio callback that measures each block's loudness into the shared
/// slot. Runs on the real-time audio thread: no allocation, no locks.
pub fn create_audio_callback(
    slot: Arc<LevelSlot>,
    channels: u16,
) -> impl FnMut(&[f32], &cpal::InputCallbackInfo) + Send + 'static {
    move |data: &[f32], _: &cpal::InputCallbackInfo| {
        let value = if channels <= 1 {
            level::rms(data)
        } else {
            level::rms_interleaved(data, channels as usize)
        };
        slot.push(value);
    }
}
