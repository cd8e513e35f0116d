//! Table-driven sine oscillator.
//!
//! A single [`SINE_TABLE_SIZE`]-entry table covering one cycle is built the
//! first time anything asks for it and shared by every oscillator. Lookups
//! interpolate linearly between neighbouring entries.

use core::f32::consts::TAU;

use once_cell::sync::OnceCell;

use crate::constants::SINE_TABLE_SIZE;

static SINE_TABLE: OnceCell<[f32; SINE_TABLE_SIZE]> = OnceCell::new();

/// The shared table, built on first use.
pub fn sine_table() -> &'static [f32; SINE_TABLE_SIZE] {
    SINE_TABLE.get_or_init(|| {
        let mut table = [0.0f32; SINE_TABLE_SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = libm::sinf(TAU * i as f32 / SINE_TABLE_SIZE as f32);
        }
        table
    })
}

/// Table sine of `x` radians; any finite `x` is accepted.
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    let table = sine_table();
    let mut x = libm::fmodf(x, TAU);
    if x < 0.0 {
        x += TAU;
    }
    let pos = x * (SINE_TABLE_SIZE as f32 / TAU);
    let idx = pos as usize;
    let frac = pos - idx as f32;
    let a = table[idx & (SINE_TABLE_SIZE - 1)];
    let b = table[(idx + 1) & (SINE_TABLE_SIZE - 1)];
    a + frac * (b - a)
}

/// Phase-accumulating sine oscillator.
///
/// Phase is kept in radians and only folded back into `[0, 2π)` at the end
/// of each generated block.
#[derive(Clone, Copy, Debug)]
pub struct SineOscillator {
    sample_rate: f32,
    frequency: f32,
    phase: f32,
    increment: f32,
}

impl SineOscillator {
    pub fn new(sample_rate: f32) -> Self {
        SineOscillator {
            sample_rate,
            frequency: 0.0,
            phase: 0.0,
            increment: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_frequency(self.frequency);
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = hz;
        self.increment = TAU * hz / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Phase advance per sample in radians.
    pub fn increment(&self) -> f32 {
        self.increment
    }

    pub fn set_phase(&mut self, radians: f32) {
        self.phase = radians;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Current output without advancing.
    pub fn sample(&self) -> f32 {
        fast_sin(self.phase)
    }

    pub fn generate(&mut self, output: &mut [f32]) {
        for out in output.iter_mut() {
            *out = fast_sin(self.phase);
            self.phase += self.increment;
        }
        self.wrap();
    }

    /// Generate with the increment scaled per sample by `1 + fm[i]`.
    pub fn generate_fm(&mut self, output: &mut [f32], fm: &[f32]) {
        for (out, &m) in output.iter_mut().zip(fm) {
            *out = fast_sin(self.phase);
            self.phase += self.increment * (1.0 + m);
        }
        self.wrap();
    }

    fn wrap(&mut self) {
        if !(0.0..TAU).contains(&self.phase) {
            self.phase = libm::fmodf(self.phase, TAU);
            if self.phase < 0.0 {
                self.phase += TAU;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn table_matches_sin_at_entries() {
        let table = sine_table();
        assert_eq!(table[0], 0.0);
        assert!((table[SINE_TABLE_SIZE / 4] - 1.0).abs() < 1e-6);
        assert!((table[3 * SINE_TABLE_SIZE / 4] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn table_is_built_once() {
        let a = sine_table() as *const _;
        let b = sine_table() as *const _;
        assert_eq!(a, b);
    }

    #[test]
    fn generate_follows_increment() {
        let mut osc = SineOscillator::new(48_000.0);
        osc.set_frequency(1_000.0);
        let mut out = [0.0f32; 8];
        osc.generate(&mut out);
        let inc = osc.increment();
        for (i, &y) in out.iter().enumerate() {
            assert!((y - libm::sinf(inc * i as f32)).abs() < 1e-4);
        }
    }

    #[test]
    fn phase_wraps_once_per_block() {
        let mut osc = SineOscillator::new(100.0);
        osc.set_frequency(30.0);
        let mut out = [0.0f32; 10];
        osc.generate(&mut out);
        assert!((0.0..TAU).contains(&osc.phase()));
    }

    #[test]
    fn zero_modulation_matches_plain() {
        let mut a = SineOscillator::new(48_000.0);
        let mut b = SineOscillator::new(48_000.0);
        a.set_frequency(440.0);
        b.set_frequency(440.0);
        let mut x = [0.0f32; 32];
        let mut y = [0.0f32; 32];
        a.generate(&mut x);
        b.generate_fm(&mut y, &[0.0; 32]);
        assert_eq!(x, y);
        assert_eq!(a.phase(), b.phase());
    }

    #[test]
    fn negative_modulation_keeps_phase_in_range() {
        let mut osc = SineOscillator::new(48_000.0);
        osc.set_frequency(2_000.0);
        let mut out = [0.0f32; 16];
        osc.generate_fm(&mut out, &[-3.0; 16]);
        assert!((0.0..TAU).contains(&osc.phase()));
    }

    proptest! {
        #[test]
        fn fast_sin_tracks_libm(x in -100.0f32..100.0) {
            prop_assert!((fast_sin(x) - libm::sinf(x)).abs() < 1e-4);
        }
    }
}
