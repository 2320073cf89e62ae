//! UI rendering and layout utilities

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::calibrate::CalibrationState;
use crate::color::Rgb;
use crate::constants::tuning;

/// Width of the overlay settings panel
const PANEL_WIDTH: u16 = 38;
/// Height of the overlay settings panel
const PANEL_HEIGHT: u16 = 17;

/// Snapshot of everything a frame needs
pub struct UiState {
    pub device_name: String,
    pub background: Rgb,
    pub level: f32,
    pub target: f32,
    pub intensity: f32,
    pub sensitivity: f32,
    pub smoothing: f32,
    pub base_sensitivity: f32,
    pub calibration: CalibrationState,
    pub panel_visible: bool,
}

/// Render the complete UI
pub fn render_ui(f: &mut Frame, state: &UiState) {
    let size = f.size();

    // Background wash driven by the smoothed intensity
    let background = Block::default().style(Style::default().bg(state.background.into()));
    f.render_widget(background, size);

    if state.panel_visible {
        render_panel(f, state, size);
    }
}

/// Settings panel anchored to the top-right corner
fn panel_area(size: Rect) -> Rect {
    let width = PANEL_WIDTH.min(size.width);
    let height = PANEL_HEIGHT.min(size.height);
    Rect {
        x: size.x + size.width - width,
        y: size.y,
        width,
        height,
    }
}

fn render_panel(f: &mut Frame, state: &UiState, size: Rect) {
    let area = panel_area(size);
    f.render_widget(Clear, area);

    let block = Block::default().title("Settings").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
        ])
        .split(inner);

    // Device line
    let device = Paragraph::new(state.device_name.as_str());
    f.render_widget(device, chunks[0]);

    // Sensitivity gauge
    let sensitivity_ratio = ((state.sensitivity - tuning::SENSITIVITY_MIN)
        / (tuning::SENSITIVITY_MAX - tuning::SENSITIVITY_MIN))
        .clamp(0.0, 1.0) as f64;
    let sensitivity = Gauge::default()
        .block(Block::default().title("Sensitivity ↑/↓").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(sensitivity_ratio)
        .label(format!("{:.0}", state.sensitivity));
    f.render_widget(sensitivity, chunks[1]);

    // Smoothing gauge
    let smoothing_ratio = ((state.smoothing - tuning::SMOOTHING_MIN)
        / (tuning::SMOOTHING_MAX - tuning::SMOOTHING_MIN))
        .clamp(0.0, 1.0) as f64;
    let smoothing = Gauge::default()
        .block(Block::default().title("Smoothing ←/→").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(smoothing_ratio)
        .label(format!("{:.0}", state.smoothing));
    f.render_widget(smoothing, chunks[2]);

    // Calibration status
    let (state_label, state_color) = match state.calibration {
        CalibrationState::Idle => ("Idle", Color::DarkGray),
        CalibrationState::Calibrating => ("Calibrating", Color::Yellow),
        CalibrationState::Calibrated => ("Calibrated", Color::Green),
    };
    let calibration = Paragraph::new(vec![
        Line::from(Span::styled(state_label, Style::default().fg(state_color))),
        Line::from(format!(
            "Offset {:+.2}  Effective {:.2}",
            state.base_sensitivity,
            state.sensitivity + state.base_sensitivity
        )),
    ])
    .block(Block::default().title("Calibration").borders(Borders::ALL));
    f.render_widget(calibration, chunks[3]);

    // Live readouts and key hints
    let help = Paragraph::new(vec![
        Line::from(format!(
            "Level {:.3}  Target {:.2}  Shown {:.2}",
            state.level, state.target, state.intensity
        )),
        Line::from("c calibrate   r reset"),
        Line::from("Tab panel   Esc quit"),
    ]);
    f.render_widget(help, chunks[4]);
}
