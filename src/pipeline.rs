//! The signal-to-color pipeline: target mapping, smoothing, calibration

use crate::calibrate::{Calibration, CalibrationState};
use crate::constants::pipeline::CHANGE_THRESHOLD;
use crate::constants::tuning;
use crate::smoothing::IntensitySmoother;

/// Live tuning parameters
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    pub sensitivity: f32,
    pub smoothing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            sensitivity: tuning::DEFAULT_SENSITIVITY,
            smoothing: tuning::DEFAULT_SMOOTHING,
        }
    }
}

/// Typed control notifications from the UI layer.
///
/// Key handling produces these; the pipeline consumes them without
/// knowing anything about the widget toolkit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    SensitivityChanged(f32),
    SmoothingChanged(f32),
    CalibrationToggled,
    CalibrationReset,
}

/// Maps the loudness envelope to a target intensity and eases the
/// displayed intensity toward it.
///
/// `target` is written only by [`on_map_tick`](Self::on_map_tick);
/// the displayed intensity is owned by the smoother and advances only
/// in [`on_visual_tick`](Self::on_visual_tick).
pub struct ColorPipeline {
    tuning: Tuning,
    calibration: Calibration,
    target: f32,
    smoother: Box<dyn IntensitySmoother>,
}

impl ColorPipeline {
    pub fn new(tuning: Tuning, smoother: Box<dyn IntensitySmoother>) -> Self {
        Self {
            tuning,
            calibration: Calibration::new(),
            target: 0.0,
            smoother,
        }
    }

    pub fn tuning(&self) -> Tuning {
        self.tuning
    }

    /// Intensity the pipeline is currently moving toward
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Intensity actually rendered, lagging the target
    pub fn intensity(&self) -> f32 {
        self.smoother.value()
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// User-configured sensitivity plus the calibration offset
    pub fn effective_sensitivity(&self) -> f32 {
        self.tuning.sensitivity + self.calibration.base_sensitivity()
    }

    /// Recompute the target from the loudness pair. A sub-threshold delta
    /// leaves the target untouched so jitter on a steady signal does not
    /// drive recomputation.
    pub fn on_map_tick(&mut self, current: f32, previous: f32) {
        if (current - previous).abs() <= CHANGE_THRESHOLD {
            return;
        }

        let mid = (current + previous) / 2.0;
        self.target = mid.exp_m1() * (self.effective_sensitivity() / self.tuning.smoothing);
    }

    /// Advance the smoother and the calibration loop one tick. Returns
    /// true when the frame should be repainted, which is only the case
    /// while the loudness delta exceeds the change threshold.
    pub fn on_visual_tick(&mut self, current: f32, previous: f32) -> bool {
        self.smoother.tick(self.target, self.tuning.smoothing);
        self.calibration.tick(self.target);

        (current - previous).abs() > CHANGE_THRESHOLD
    }

    /// Apply a control notification from the UI layer
    pub fn handle(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::SensitivityChanged(value) => {
                self.tuning.sensitivity =
                    value.clamp(tuning::SENSITIVITY_MIN, tuning::SENSITIVITY_MAX);
            }
            ControlEvent::SmoothingChanged(value) => {
                self.tuning.smoothing = value.clamp(tuning::SMOOTHING_MIN, tuning::SMOOTHING_MAX);
            }
            ControlEvent::CalibrationToggled => self.calibration.toggle(),
            ControlEvent::CalibrationReset => self.calibration.reset(),
        }
    }

    /// True while the calibration loop is actively adjusting; the UI uses
    /// this to keep the panel readouts fresh
    pub fn is_calibrating(&self) -> bool {
        self.calibration.state() == CalibrationState::Calibrating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoothing::ExpApproach;

    fn pipeline() -> ColorPipeline {
        ColorPipeline::new(Tuning::default(), Box::new(ExpApproach::new()))
    }

    #[test]
    fn test_sub_threshold_delta_leaves_target_unchanged() {
        let mut p = pipeline();
        p.on_map_tick(0.5, 0.6);
        let target = p.target();
        assert!(target > 0.0);

        // Deltas at or below the threshold are ignored
        p.on_map_tick(0.6, 0.6);
        assert_eq!(p.target(), target);
        p.on_map_tick(0.6005, 0.6);
        assert_eq!(p.target(), target);
    }

    #[test]
    fn test_target_follows_mapping_formula() {
        let mut p = pipeline();
        p.on_map_tick(0.5, 0.6);

        // expm1(0.55) * (12 / 6)
        let expected = 0.55f32.exp_m1() * 2.0;
        assert!((p.target() - expected).abs() < 1e-6);
        assert!((p.target() - 1.4665).abs() < 1e-3);
    }

    #[test]
    fn test_calibration_offset_raises_effective_sensitivity() {
        let mut p = pipeline();
        p.handle(ControlEvent::CalibrationToggled);

        // Quiet signal keeps the target below the ceiling, so the offset grows
        for _ in 0..4 {
            p.on_visual_tick(0.0, 0.0);
        }
        assert!((p.effective_sensitivity() - 13.0).abs() < 0.001);

        p.on_map_tick(0.5, 0.6);
        let expected = 0.55f32.exp_m1() * (13.0 / 6.0);
        assert!((p.target() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_calibration_reset_through_events() {
        let mut p = pipeline();
        p.handle(ControlEvent::CalibrationToggled);
        for _ in 0..10 {
            p.on_visual_tick(0.0, 0.0);
        }
        assert!(p.calibration().base_sensitivity() > 0.0);

        p.handle(ControlEvent::CalibrationReset);
        assert_eq!(p.calibration().base_sensitivity(), 0.0);
        assert_eq!(p.calibration().state(), CalibrationState::Idle);
        assert!((p.effective_sensitivity() - 12.0).abs() < 0.001);
    }

    #[test]
    fn test_tuning_events_clamp_to_range() {
        let mut p = pipeline();

        p.handle(ControlEvent::SensitivityChanged(25.0));
        assert_eq!(p.tuning().sensitivity, tuning::SENSITIVITY_MAX);
        p.handle(ControlEvent::SensitivityChanged(0.0));
        assert_eq!(p.tuning().sensitivity, tuning::SENSITIVITY_MIN);

        p.handle(ControlEvent::SmoothingChanged(0.0));
        assert_eq!(p.tuning().smoothing, tuning::SMOOTHING_MIN);
        p.handle(ControlEvent::SmoothingChanged(99.0));
        assert_eq!(p.tuning().smoothing, tuning::SMOOTHING_MAX);
    }

    #[test]
    fn test_redraw_gated_on_signal_activity() {
        let mut p = pipeline();
        assert!(!p.on_visual_tick(0.2, 0.2));
        assert!(p.on_visual_tick(0.3, 0.2));
        assert!(!p.on_visual_tick(0.3, 0.3));
    }

    #[test]
    fn test_block_sequence_jumps_target_once_then_converges() {
        let mut p = pipeline();

        // Block RMS sequence 0.0, 0.0, 0.3, 0.3 as (current, previous) pairs
        let pairs = [(0.0, 0.0), (0.0, 0.0), (0.3, 0.0), (0.3, 0.3)];
        let mut targets = Vec::new();
        for (current, previous) in pairs {
            p.on_map_tick(current, previous);
            targets.push(p.target());
        }

        // The target jumps exactly once, between the second and third block
        assert_eq!(targets[0], 0.0);
        assert_eq!(targets[1], 0.0);
        let jumped = 0.15f32.exp_m1() * 2.0;
        assert!((targets[2] - jumped).abs() < 1e-6);
        assert_eq!(targets[3], targets[2]);

        // The displayed intensity approaches it monotonically, no overshoot
        let mut last = p.intensity();
        for _ in 0..120 {
            p.on_visual_tick(0.3, 0.3);
            let value = p.intensity();
            assert!(value >= last);
            assert!(value <= p.target());
            last = value;
        }
        assert!((last - p.target()).abs() < 0.001);
    }
}
