//! Block loudness measurement and the shared level slot

use std::sync::atomic::{AtomicU32, Ordering};

/// Compute RMS amplitude over one block of samples
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt().clamp(0.0, 1.0)
}

/// RMS amplitude of the first channel of an interleaved buffer
pub fn rms_interleaved(samples: &[f32], channels: usize) -> f32 {
    if channels <= 1 {
        return rms(samples);
    }

    let mut sum = 0.0f32;
    let mut count = 0usize;
    for s in samples.iter().step_by(channels) {
        sum += s * s;
        count += 1;
    }

    if count == 0 {
        0.0
    } else {
        (sum / count as f32).sqrt().clamp(0.0, 1.0)
    }
}

/// Single-writer slot holding the current and previous block RMS.
///
/// The audio callback writes, the UI tick reads. Values are stored as f32
/// bit patterns in atomics so the audio path never takes a lock. A read
/// that overlaps a write may pair a fresh `current` with a stale
/// `previous`; the pipeline tolerates that one-tick lag.
pub struct LevelSlot {
    current: AtomicU32,
    previous: AtomicU32,
}

impl LevelSlot {
    pub fn new() -> Self {
        Self {
            current: AtomicU32::new(0.0f32.to_bits()),
            previous: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    /// Shift the current value into previous, then store a new block RMS.
    /// Only the audio callback thread may call this.
    pub fn push(&self, value: f32) {
        let last = self.current.load(Ordering::Relaxed);
        self.previous.store(last, Ordering::Relaxed);
        self.current.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Read the (current, previous) loudness pair
    pub fn read(&self) -> (f32, f32) {
        (
            f32::from_bits(self.current.load(Ordering::Relaxed)),
            f32::from_bits(self.previous.load(Ordering::Relaxed)),
        )
    }

    /// Zero both values; called when the stream stops
    pub fn reset(&self) {
        self.current.store(0.0f32.to_bits(), Ordering::Relaxed);
        self.previous.store(0.0f32.to_bits(), Ordering::Relaxed);
    }
}

impl Default for LevelSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_of_silence() {
        assert_eq!(rms(&[0.0; 512]), 0.0);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_rms_of_full_scale() {
        let block = [1.0f32; 512];
        assert!((rms(&block) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_rms_of_half_scale() {
        let block = [0.5f32; 512];
        assert!((rms(&block) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_rms_interleaved_uses_first_channel() {
        // Channel 0 at half scale, channel 1 at full scale
        let block: Vec<f32> = (0..512)
            .map(|i| if i % 2 == 0 { 0.5 } else { 1.0 })
            .collect();
        assert!((rms_interleaved(&block, 2) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_slot_push_shifts_current_to_previous() {
        let slot = LevelSlot::new();
        slot.push(0.3);
        assert_eq!(slot.read(), (0.3, 0.0));
        slot.push(0.7);
        assert_eq!(slot.read(), (0.7, 0.3));
    }

    #[test]
    fn test_slot_reset_zeroes_both() {
        let slot = LevelSlot::new();
        slot.push(0.3);
        slot.push(0.7);
        slot.reset();
        assert_eq!(slot.read(), (0.0, 0.0));
    }
}
