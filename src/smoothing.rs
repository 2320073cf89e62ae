//! Intensity smoothing strategies

use std::collections::VecDeque;

/// Moves the displayed intensity toward the mapped target, one visual
/// tick at a time.
pub trait IntensitySmoother: Send {
    /// Advance one tick toward `target` and return the new intensity
    fn tick(&mut self, target: f32, smoothing: f32) -> f32;

    /// Current intensity without advancing
    fn value(&self) -> f32;

    /// Drop accumulated state
    fn reset(&mut self);
}

/// Exponential approach: each tick closes 1/smoothing of the remaining
/// distance to the target. Converges without overshoot for smoothing > 1,
/// though it never lands exactly on the target.
pub struct ExpApproach {
    current: f32,
}

impl ExpApproach {
    pub fn new() -> Self {
        Self { current: 0.0 }
    }
}

impl Default for ExpApproach {
    fn default() -> Self {
        Self::new()
    }
}

impl IntensitySmoother for ExpApproach {
    fn tick(&mut self, target: f32, smoothing: f32) -> f32 {
        let step = (self.current - target).abs() / smoothing;
        if self.current < target {
            self.current += step;
        } else {
            self.current -= step;
        }
        self.current
    }

    fn value(&self) -> f32 {
        self.current
    }

    fn reset(&mut self) {
        self.current = 0.0;
    }
}

/// Moving average over the last few targets. Responds in a straight line
/// rather than an exponential curve.
pub struct MovingAverage {
    window: VecDeque<f32>,
    capacity: usize,
    current: f32,
}

impl MovingAverage {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            current: 0.0,
        }
    }
}

impl IntensitySmoother for MovingAverage {
    fn tick(&mut self, target: f32, _smoothing: f32) -> f32 {
        self.window.push_back(target);
        if self.window.len() > self.capacity {
            self.window.pop_front();
        }
        self.current = self.window.iter().sum::<f32>() / self.window.len() as f32;
        self.current
    }

    fn value(&self) -> f32 {
        self.current
    }

    fn reset(&mut self) {
        self.window.clear();
        self.current = 0.0;
    }
}
