//! Main application logic and orchestration

use std::io;
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::StreamTrait;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::audio;
use crate::config::{Config, SmootherKind};
use crate::constants;
use crate::error::AppResult;
use crate::level::LevelSlot;
use crate::pipeline::{ColorPipeline, ControlEvent};
use crate::smoothing::{ExpApproach, IntensitySmoother, MovingAverage};
use crate::ui;

/// Main application struct
pub struct App {
    config: Config,
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
}

impl App {
    /// Initialize the application with configuration
    pub fn new_with_config(config: Config) -> AppResult<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(App { config, terminal })
    }

    /// Run the main display loop
    pub async fn run(mut self) -> AppResult<()> {
        // Setup audio
        let (device, audio_config) = match audio::setup_audio_device(self.config.device_name.clone())
        {
            Ok(result) => result,
            Err(e) => {
                let _ = self.cleanup();
                return Err(e);
            }
        };
        let device_name = audio_config.device_name.clone();

        // Shared loudness slot: written by the audio callback, read here
        let slot = Arc::new(LevelSlot::new());
        let audio_callback = audio::create_audio_callback(Arc::clone(&slot), audio_config.channels);

        let stream_config = cpal::StreamConfig {
            channels: audio_config.channels,
            sample_rate: cpal::SampleRate(audio_config.sample_rate),
            buffer_size: constants::audio::BUFFER_SIZE,
        };

        let stream = match audio::build_audio_stream(&device, &stream_config, audio_callback)
            .and_then(|stream| {
                stream.play()?;
                Ok(stream)
            }) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = self.cleanup();
                return Err(e);
            }
        };
        info!("capturing from '{}' at {} Hz", device_name, audio_config.sample_rate);

        let smoother: Box<dyn IntensitySmoother> = match self.config.smoother {
            SmootherKind::Exp => Box::new(ExpApproach::new()),
            SmootherKind::Average => {
                Box::new(MovingAverage::new(constants::pipeline::AVERAGE_WINDOW))
            }
        };
        let mut pipeline = ColorPipeline::new(self.config.tuning, smoother);

        // Main UI loop
        let mut interval =
            tokio::time::interval(Duration::from_millis(constants::ui::FRAME_INTERVAL_MS));
        let mut tick: u64 = 0;
        let mut panel_visible = true;
        let mut needs_redraw = true;

        let result = loop {
            let (current, previous) = slot.read();

            // Target mapping runs at a throttled sub-rate of the visual tick
            if tick % constants::ui::MAP_TICK_DIVISOR == 0 {
                pipeline.on_map_tick(current, previous);
            }
            if pipeline.on_visual_tick(current, previous) {
                needs_redraw = true;
            }
            // Keep the panel readouts moving while the offset is adjusting
            if panel_visible && pipeline.is_calibrating() {
                needs_redraw = true;
            }

            if needs_redraw {
                let ui_state = ui::UiState {
                    device_name: device_name.clone(),
                    background: self
                        .config
                        .min_color
                        .lerp(self.config.max_color, pipeline.intensity()),
                    level: current,
                    target: pipeline.target(),
                    intensity: pipeline.intensity(),
                    sensitivity: pipeline.tuning().sensitivity,
                    smoothing: pipeline.tuning().smoothing,
                    base_sensitivity: pipeline.calibration().base_sensitivity(),
                    calibration: pipeline.calibration().state(),
                    panel_visible,
                };
                if let Err(e) = self.terminal.draw(|f| ui::render_ui(f, &ui_state)) {
                    break Err(e.into());
                }
                needs_redraw = false;
            }

            // Check for keyboard events and signals
            let mut should_exit = false;

            // Check for Ctrl+C signal
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    should_exit = true;
                }
                _ = tokio::time::sleep(Duration::from_millis(1)) => {
                    // Timeout - check for keyboard events
                }
            }

            if !should_exit && crossterm::event::poll(Duration::from_millis(0)).unwrap_or(false)
                && let Ok(Event::Key(key_event)) = crossterm::event::read() {
                match key_event.code {
                    KeyCode::Esc | KeyCode::Char('q') => {
                        should_exit = true;
                    }
                    KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                        should_exit = true;
                    }
                    KeyCode::Up => {
                        let value = pipeline.tuning().sensitivity + constants::tuning::KEY_STEP;
                        pipeline.handle(ControlEvent::SensitivityChanged(value));
                        needs_redraw = true;
                    }
                    KeyCode::Down => {
                        let value = pipeline.tuning().sensitivity - constants::tuning::KEY_STEP;
                        pipeline.handle(ControlEvent::SensitivityChanged(value));
                        needs_redraw = true;
                    }
                    KeyCode::Right => {
                        let value = pipeline.tuning().smoothing + constants::tuning::KEY_STEP;
                        pipeline.handle(ControlEvent::SmoothingChanged(value));
                        needs_redraw = true;
                    }
                    KeyCode::Left => {
                        let value = pipeline.tuning().smoothing - constants::tuning::KEY_STEP;
                        pipeline.handle(ControlEvent::SmoothingChanged(value));
                        needs_redraw = true;
                    }
                    KeyCode::Char('c') => {
                        pipeline.handle(ControlEvent::CalibrationToggled);
                        needs_redraw = true;
                    }
                    KeyCode::Char('r') => {
                        pipeline.handle(ControlEvent::CalibrationReset);
                        needs_redraw = true;
                    }
                    KeyCode::Tab | KeyCode::Char('p') => {
                        panel_visible = !panel_visible;
                        needs_redraw = true;
                    }
                    _ => {}
                }
            }

            if should_exit {
                break Ok(());
            }

            tick = tick.wrapping_add(1);

            // Wait for next interval
            interval.tick().await;
        };

        // Cleanup - stop the stream and zero the loudness slot
        drop(stream);
        slot.reset();
        info!("stream stopped");

        let cleanup = self.cleanup();
        result.and(cleanup)
    }

    /// Clean up terminal state
    fn cleanup(mut self) -> AppResult<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
