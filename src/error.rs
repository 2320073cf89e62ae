//! Custom error types for the application

use thiserror::Error;

/// Application-specific error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Audio device related errors
    #[error("Audio device error: {0}")]
    AudioDevice(String),
    /// Audio stream related errors
    #[error("Audio stream error: {0}")]
    AudioStream(String),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cpal::DevicesError> for AppError {
    fn from(err: cpal::DevicesError) -> Self {
        AppError::AudioDevice(format!("Failed to enumerate devices: {}", err))
    }
}

impl From<cpal::DeviceNameError> for AppError {
    fn from(err: cpal::DeviceNameError) -> Self {
        AppError::AudioDevice(format!("Failed to get device name: {}", err))
    }
}

impl From<cpal::SupportedStreamConfigsError> for AppError {
    fn from(err: cpal::SupportedStreamConfigsError) -> Self {
        AppError::AudioDevice(format!("Failed to get supported stream configs: {}", err))
    }
}

impl From<cpal::BuildStreamError> for AppError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AppError::AudioStream(format!("Failed to build audio stream: {}", err))
    }
}

impl From<cpal::PlayStreamError> for AppError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AppError::AudioStream(format!("Failed to play audio stream: {}", err))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
