//! Cascaded second-order sections, transposed direct form II.
//!
//! Coefficients are stored five per stage as `{b0, b1, b2, a1, a2}`, with the
//! feedback terms already negated so the recurrence only adds:
//!
//! ```text
//! out = b0·in + d1
//! d1  = b1·in + a1·out + d2
//! d2  = b2·in + a2·out
//! ```
//!
//! The design functions fill stage 0; filters then replicate stage 0 into
//! every other stage, so an N-stage cascade is N identical sections.
//!
//! A [`MultiBiquadFilter`] keeps one coefficient table and one state record
//! per channel. Retuning it retunes every channel at once while each channel
//! keeps its own filter memory.

use core::f32::consts::{PI, SQRT_2};

use libm::{fabsf, powf, sqrtf, tanf};

use crate::arena::Arena;
use crate::buffer::SampleBuffer;
use crate::error::Result;

pub const COEFFICIENTS_PER_STAGE: usize = 5;
pub const STATE_PER_STAGE: usize = 2;

/// 1/√3
pub const BESSEL_Q: f32 = 0.57735026919;
/// 1/2
pub const SALLEN_KEY_Q: f32 = 0.5;
/// 1/√2
pub const BUTTERWORTH_Q: f32 = 0.70710678118;

// Design formulas. `omega` is the normalised angular cutoff 2π·fc/fs. Callers
// keep 0 < omega < π and q > 0.

pub fn set_low_pass(c: &mut [f32], omega: f32, q: f32) {
    let k = tanf(omega * 0.5);
    let norm = 1.0 / (1.0 + k / q + k * k);
    c[0] = k * k * norm;
    c[1] = 2.0 * c[0];
    c[2] = c[0];
    c[3] = -2.0 * (k * k - 1.0) * norm;
    c[4] = -(1.0 - k / q + k * k) * norm;
}

pub fn set_high_pass(c: &mut [f32], omega: f32, q: f32) {
    let k = tanf(omega * 0.5);
    let norm = 1.0 / (1.0 + k / q + k * k);
    c[0] = norm;
    c[1] = -2.0 * c[0];
    c[2] = c[0];
    c[3] = -2.0 * (k * k - 1.0) * norm;
    c[4] = -(1.0 - k / q + k * k) * norm;
}

pub fn set_band_pass(c: &mut [f32], omega: f32, q: f32) {
    let k = tanf(omega * 0.5);
    let norm = 1.0 / (1.0 + k / q + k * k);
    c[0] = k / q * norm;
    c[1] = 0.0;
    c[2] = -c[0];
    c[3] = -2.0 * (k * k - 1.0) * norm;
    c[4] = -(1.0 - k / q + k * k) * norm;
}

pub fn set_all_pass(c: &mut [f32], omega: f32, q: f32) {
    let k = tanf(omega * 0.5);
    let norm = 1.0 / (1.0 + k / q + k * k);
    c[0] = (1.0 - k / q + k * k) * norm;
    c[1] = 2.0 * (k * k - 1.0) * norm;
    c[2] = 1.0;
    c[3] = -c[1];
    c[4] = -c[0];
}

pub fn set_notch(c: &mut [f32], omega: f32, q: f32) {
    let k = tanf(omega * 0.5);
    let norm = 1.0 / (1.0 + k / q + k * k);
    c[0] = (1.0 + k * k) * norm;
    c[1] = 2.0 * (k * k - 1.0) * norm;
    c[2] = c[0];
    c[3] = -c[1];
    c[4] = -(1.0 - k / q + k * k) * norm;
}

/// Peaking filter; `gain` in dB. Boost and cut use mirrored formulas.
pub fn set_peak(c: &mut [f32], omega: f32, q: f32, gain: f32) {
    let k = tanf(omega * 0.5);
    let v = powf(10.0, fabsf(gain) / 20.0);
    if gain >= 0.0 {
        let norm = 1.0 / (1.0 + k / q + k * k);
        c[0] = (1.0 + v / q * k + k * k) * norm;
        c[1] = 2.0 * (k * k - 1.0) * norm;
        c[2] = (1.0 - v / q * k + k * k) * norm;
        c[3] = -c[1];
        c[4] = -(1.0 - k / q + k * k) * norm;
    } else {
        let norm = 1.0 / (1.0 + v / q * k + k * k);
        c[0] = (1.0 + k / q + k * k) * norm;
        c[1] = 2.0 * (k * k - 1.0) * norm;
        c[2] = (1.0 - k / q + k * k) * norm;
        c[3] = -c[1];
        c[4] = -(1.0 - v / q * k + k * k) * norm;
    }
}

/// Low shelf; `gain` in dB.
pub fn set_low_shelf(c: &mut [f32], omega: f32, gain: f32) {
    let k = tanf(omega * 0.5);
    let v = powf(10.0, fabsf(gain) / 20.0);
    let sv = sqrtf(2.0 * v);
    if gain >= 0.0 {
        let norm = 1.0 / (1.0 + SQRT_2 * k + k * k);
        c[0] = (1.0 + sv * k + v * k * k) * norm;
        c[1] = 2.0 * (v * k * k - 1.0) * norm;
        c[2] = (1.0 - sv * k + v * k * k) * norm;
        c[3] = -2.0 * (k * k - 1.0) * norm;
        c[4] = -(1.0 - SQRT_2 * k + k * k) * norm;
    } else {
        let norm = 1.0 / (1.0 + sv * k + v * k * k);
        c[0] = (1.0 + SQRT_2 * k + k * k) * norm;
        c[1] = 2.0 * (k * k - 1.0) * norm;
        c[2] = (1.0 - SQRT_2 * k + k * k) * norm;
        c[3] = -2.0 * (v * k * k - 1.0) * norm;
        c[4] = -(1.0 - sv * k + v * k * k) * norm;
    }
}

/// High shelf; `gain` in dB.
pub fn set_high_shelf(c: &mut [f32], omega: f32, gain: f32) {
    let k = tanf(omega * 0.5);
    let v = powf(10.0, fabsf(gain) / 20.0);
    let sv = sqrtf(2.0 * v);
    if gain >= 0.0 {
        let norm = 1.0 / (1.0 + SQRT_2 * k + k * k);
        c[0] = (v + sv * k + k * k) * norm;
        c[1] = 2.0 * (k * k - v) * norm;
        c[2] = (v - sv * k + k * k) * norm;
        c[3] = -2.0 * (k * k - 1.0) * norm;
        c[4] = -(1.0 - SQRT_2 * k + k * k) * norm;
    } else {
        let norm = 1.0 / (v + sv * k + k * k);
        c[0] = (1.0 + SQRT_2 * k + k * k) * norm;
        c[1] = 2.0 * (k * k - 1.0) * norm;
        c[2] = (1.0 - SQRT_2 * k + k * k) * norm;
        c[3] = -2.0 * (k * k - v) * norm;
        c[4] = -(v - sv * k + k * k) * norm;
    }
}

/// Copy stage 0 over every later stage.
fn replicate_first_stage(coefficients: &mut [f32]) {
    let (first, rest) = coefficients.split_at_mut(COEFFICIENTS_PER_STAGE);
    for stage in rest.chunks_exact_mut(COEFFICIENTS_PER_STAGE) {
        stage.copy_from_slice(first);
    }
}

/// Filter `samples` in place through every stage in turn.
pub fn process_cascade(coefficients: &[f32], state: &mut [f32], samples: &mut [f32]) {
    for (c, s) in coefficients
        .chunks_exact(COEFFICIENTS_PER_STAGE)
        .zip(state.chunks_exact_mut(STATE_PER_STAGE))
    {
        let (b0, b1, b2, a1, a2) = (c[0], c[1], c[2], c[3], c[4]);
        let (mut d1, mut d2) = (s[0], s[1]);
        for x in samples.iter_mut() {
            let input = *x;
            let out = b0 * input + d1;
            d1 = b1 * input + a1 * out + d2;
            d2 = b2 * input + a2 * out;
            *x = out;
        }
        s[0] = d1;
        s[1] = d2;
    }
}

/// One sample through every stage.
pub fn process_cascade_sample(coefficients: &[f32], state: &mut [f32], input: f32) -> f32 {
    let mut x = input;
    for (c, s) in coefficients
        .chunks_exact(COEFFICIENTS_PER_STAGE)
        .zip(state.chunks_exact_mut(STATE_PER_STAGE))
    {
        let out = c[0] * x + s[0];
        s[0] = c[1] * x + c[3] * out + s[1];
        s[1] = c[2] * x + c[4] * out;
        x = out;
    }
    x
}

/// One section of a cascade, tuned in Hz.
pub struct FilterStage<'s> {
    pub coefficients: &'s mut [f32],
    pub state: &'s mut [f32],
}

impl FilterStage<'_> {
    pub fn set_low_pass(&mut self, fc: f32, q: f32, sample_rate: f32) {
        set_low_pass(self.coefficients, omega(fc, sample_rate), q);
    }

    pub fn set_high_pass(&mut self, fc: f32, q: f32, sample_rate: f32) {
        set_high_pass(self.coefficients, omega(fc, sample_rate), q);
    }

    pub fn set_band_pass(&mut self, fc: f32, q: f32, sample_rate: f32) {
        set_band_pass(self.coefficients, omega(fc, sample_rate), q);
    }

    pub fn set_all_pass(&mut self, fc: f32, q: f32, sample_rate: f32) {
        set_all_pass(self.coefficients, omega(fc, sample_rate), q);
    }

    pub fn set_notch(&mut self, fc: f32, q: f32, sample_rate: f32) {
        set_notch(self.coefficients, omega(fc, sample_rate), q);
    }

    pub fn set_peak(&mut self, fc: f32, q: f32, gain: f32, sample_rate: f32) {
        set_peak(self.coefficients, omega(fc, sample_rate), q, gain);
    }

    pub fn set_low_shelf(&mut self, fc: f32, gain: f32, sample_rate: f32) {
        set_low_shelf(self.coefficients, omega(fc, sample_rate), gain);
    }

    pub fn set_high_shelf(&mut self, fc: f32, gain: f32, sample_rate: f32) {
        set_high_shelf(self.coefficients, omega(fc, sample_rate), gain);
    }

    pub fn copy_coefficients(&mut self, source: &[f32]) {
        let n = source.len().min(COEFFICIENTS_PER_STAGE);
        self.coefficients[..n].copy_from_slice(&source[..n]);
    }
}

#[inline]
fn omega(fc: f32, sample_rate: f32) -> f32 {
    2.0 * PI * fc / sample_rate
}

/// Hz-based tuning methods shared by single- and multi-channel cascades.
macro_rules! impl_tuning {
    () => {
        pub fn set_low_pass(&mut self, fc: f32, q: f32) {
            set_low_pass(self.coefficients, fc * self.two_pi_over_sr, q);
            replicate_first_stage(self.coefficients);
        }

        pub fn set_high_pass(&mut self, fc: f32, q: f32) {
            set_high_pass(self.coefficients, fc * self.two_pi_over_sr, q);
            replicate_first_stage(self.coefficients);
        }

        pub fn set_band_pass(&mut self, fc: f32, q: f32) {
            set_band_pass(self.coefficients, fc * self.two_pi_over_sr, q);
            replicate_first_stage(self.coefficients);
        }

        pub fn set_all_pass(&mut self, fc: f32, q: f32) {
            set_all_pass(self.coefficients, fc * self.two_pi_over_sr, q);
            replicate_first_stage(self.coefficients);
        }

        pub fn set_notch(&mut self, fc: f32, q: f32) {
            set_notch(self.coefficients, fc * self.two_pi_over_sr, q);
            replicate_first_stage(self.coefficients);
        }

        /// `gain` in dB.
        pub fn set_peak(&mut self, fc: f32, q: f32, gain: f32) {
            set_peak(self.coefficients, fc * self.two_pi_over_sr, q, gain);
            replicate_first_stage(self.coefficients);
        }

        /// `gain` in dB.
        pub fn set_low_shelf(&mut self, fc: f32, gain: f32) {
            set_low_shelf(self.coefficients, fc * self.two_pi_over_sr, gain);
            replicate_first_stage(self.coefficients);
        }

        /// `gain` in dB.
        pub fn set_high_shelf(&mut self, fc: f32, gain: f32) {
            set_high_shelf(self.coefficients, fc * self.two_pi_over_sr, gain);
            replicate_first_stage(self.coefficients);
        }

        /// Load stage-0 coefficients and replicate them.
        pub fn copy_coefficients(&mut self, source: &[f32]) {
            let n = source.len().min(COEFFICIENTS_PER_STAGE);
            self.coefficients[..n].copy_from_slice(&source[..n]);
            replicate_first_stage(self.coefficients);
        }

        pub fn coefficients(&self) -> &[f32] {
            &*self.coefficients
        }

        pub fn stages(&self) -> usize {
            self.stages
        }

        pub fn sample_rate(&self) -> f32 {
            2.0 * PI / self.two_pi_over_sr
        }

        pub fn set_sample_rate(&mut self, sample_rate: f32) {
            self.two_pi_over_sr = 2.0 * PI / sample_rate;
        }
    };
}

/// Single-channel cascade.
pub struct BiquadFilter<'a> {
    coefficients: &'a mut [f32],
    state: &'a mut [f32],
    stages: usize,
    two_pi_over_sr: f32,
}

impl<'a> BiquadFilter<'a> {
    /// Allocate coefficients and zeroed state for `stages` sections.
    pub fn create(arena: &mut Arena<'a>, sample_rate: f32, stages: usize) -> Result<Self> {
        let coefficients = arena.alloc_floats(stages * COEFFICIENTS_PER_STAGE)?;
        let state = arena.alloc_floats(stages * STATE_PER_STAGE)?;
        Ok(Self::from_parts(sample_rate, coefficients, state))
    }

    /// Build over caller-owned storage. The stage count follows from
    /// `coefficients.len() / 5`; `state` needs two values per stage.
    pub fn from_parts(sample_rate: f32, coefficients: &'a mut [f32], state: &'a mut [f32]) -> Self {
        let stages = (coefficients.len() / COEFFICIENTS_PER_STAGE).min(state.len() / STATE_PER_STAGE);
        state.fill(0.0);
        BiquadFilter {
            coefficients,
            state,
            stages,
            two_pi_over_sr: 2.0 * PI / sample_rate,
        }
    }

    impl_tuning!();

    pub fn state(&self) -> &[f32] {
        &*self.state
    }

    /// Overwrite the filter memory.
    pub fn copy_state(&mut self, source: &[f32]) {
        let n = source.len().min(self.state.len());
        self.state[..n].copy_from_slice(&source[..n]);
    }

    /// Clear the filter memory.
    pub fn reset(&mut self) {
        self.state.fill(0.0);
    }

    /// Section `k` of the cascade.
    pub fn stage(&mut self, k: usize) -> FilterStage<'_> {
        let c = k * COEFFICIENTS_PER_STAGE;
        let s = k * STATE_PER_STAGE;
        FilterStage {
            coefficients: &mut self.coefficients[c..c + COEFFICIENTS_PER_STAGE],
            state: &mut self.state[s..s + STATE_PER_STAGE],
        }
    }

    pub fn process(&mut self, samples: &mut [f32]) {
        process_cascade(&*self.coefficients, self.state, samples);
    }

    /// Filter `input` into `output`, leaving `input` intact.
    pub fn process_into(&mut self, input: &[f32], output: &mut [f32]) {
        let n = input.len().min(output.len());
        output[..n].copy_from_slice(&input[..n]);
        self.process(&mut output[..n]);
    }

    pub fn process_sample(&mut self, input: f32) -> f32 {
        process_cascade_sample(&*self.coefficients, self.state, input)
    }

    /// Low-pass with the cutoff retuned every sample from `fc`.
    pub fn process_low_pass(&mut self, input: &[f32], fc: &[f32], q: f32, output: &mut [f32]) {
        for ((o, &x), &f) in output.iter_mut().zip(input).zip(fc) {
            self.set_low_pass(f, q);
            *o = self.process_sample(x);
        }
    }

    /// High-pass with the cutoff retuned every sample from `fc`.
    pub fn process_high_pass(&mut self, input: &[f32], fc: &[f32], q: f32, output: &mut [f32]) {
        for ((o, &x), &f) in output.iter_mut().zip(input).zip(fc) {
            self.set_high_pass(f, q);
            *o = self.process_sample(x);
        }
    }

    /// Band-pass with the cutoff retuned every sample from `fc`.
    pub fn process_band_pass(&mut self, input: &[f32], fc: &[f32], q: f32, output: &mut [f32]) {
        for ((o, &x), &f) in output.iter_mut().zip(input).zip(fc) {
            self.set_band_pass(f, q);
            *o = self.process_sample(x);
        }
    }

    /// All-pass with the cutoff retuned every sample from `fc`.
    pub fn process_all_pass(&mut self, input: &[f32], fc: &[f32], q: f32, output: &mut [f32]) {
        for ((o, &x), &f) in output.iter_mut().zip(input).zip(fc) {
            self.set_all_pass(f, q);
            *o = self.process_sample(x);
        }
    }
}

/// One channel of a [`MultiBiquadFilter`]: shared coefficients, own state.
pub struct BiquadChannel<'f> {
    coefficients: &'f [f32],
    state: &'f mut [f32],
}

impl BiquadChannel<'_> {
    pub fn process(&mut self, samples: &mut [f32]) {
        process_cascade(&*self.coefficients, self.state, samples);
    }

    pub fn process_sample(&mut self, input: f32) -> f32 {
        process_cascade_sample(&*self.coefficients, self.state, input)
    }

    pub fn state(&self) -> &[f32] {
        &*self.state
    }
}

/// `N` channels sharing one coefficient table.
pub struct MultiBiquadFilter<'a, const N: usize> {
    coefficients: &'a mut [f32],
    states: [&'a mut [f32]; N],
    stages: usize,
    two_pi_over_sr: f32,
}

/// Two channels sharing one coefficient table.
pub type StereoBiquadFilter<'a> = MultiBiquadFilter<'a, 2>;

impl<'a, const N: usize> MultiBiquadFilter<'a, N> {
    pub fn create(arena: &mut Arena<'a>, sample_rate: f32, stages: usize) -> Result<Self> {
        let coefficients = arena.alloc_floats(stages * COEFFICIENTS_PER_STAGE)?;
        let mut states: [&'a mut [f32]; N] = core::array::from_fn(|_| Default::default());
        for state in states.iter_mut() {
            *state = arena.alloc_floats(stages * STATE_PER_STAGE)?;
        }
        Ok(MultiBiquadFilter {
            coefficients,
            states,
            stages,
            two_pi_over_sr: 2.0 * PI / sample_rate,
        })
    }

    impl_tuning!();

    /// Worker view for one channel; `None` when `ch >= N`.
    pub fn channel(&mut self, ch: usize) -> Option<BiquadChannel<'_>> {
        let coefficients = &*self.coefficients;
        self.states.get_mut(ch).map(|state| BiquadChannel {
            coefficients,
            state: &mut **state,
        })
    }

    /// Filter every channel of `buffer` in place.
    pub fn process(&mut self, buffer: &mut SampleBuffer<'_, N>) {
        for ch in 0..N {
            process_cascade(&*self.coefficients, self.states[ch], &mut buffer.samples(ch));
        }
    }

    /// Clear every channel's memory.
    pub fn reset(&mut self) {
        for state in self.states.iter_mut() {
            state.fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    const SR: f32 = 48_000.0;

    fn regions() -> (Vec<u8>, Vec<u8>) {
        (vec![0u8; 4096], vec![0u8; 64 * 1024])
    }

    #[test]
    fn butterworth_low_pass_symmetry() {
        let mut c = [0.0f32; 5];
        set_low_pass(&mut c, omega(1_000.0, SR), BUTTERWORTH_Q);
        assert_eq!(c[0], c[2]);
        assert_eq!(c[1], 2.0 * c[0]);
    }

    #[test]
    fn low_pass_has_unity_dc_gain() {
        let mut c = [0.0f32; 5];
        set_low_pass(&mut c, omega(500.0, SR), BUTTERWORTH_Q);
        let dc = (c[0] + c[1] + c[2]) / (1.0 - c[3] - c[4]);
        assert!((dc - 1.0).abs() < 1e-4);
    }

    #[test]
    fn high_pass_blocks_dc() {
        let mut c = [0.0f32; 5];
        set_high_pass(&mut c, omega(500.0, SR), BUTTERWORTH_Q);
        assert!((c[0] + c[1] + c[2]).abs() < 1e-6);
    }

    #[test]
    fn all_pass_has_unity_gain_at_dc() {
        let mut c = [0.0f32; 5];
        set_all_pass(&mut c, omega(2_000.0, SR), 0.7);
        let dc = (c[0] + c[1] + c[2]) / (1.0 - c[3] - c[4]);
        assert!((dc - 1.0).abs() < 1e-4);
    }

    #[test]
    fn shelf_gain_at_dc() {
        let mut c = [0.0f32; 5];
        set_low_shelf(&mut c, omega(200.0, SR), 6.0);
        let dc = (c[0] + c[1] + c[2]) / (1.0 - c[3] - c[4]);
        assert!((dc - powf(10.0, 6.0 / 20.0)).abs() < 1e-2);

        set_low_shelf(&mut c, omega(200.0, SR), -6.0);
        let dc = (c[0] + c[1] + c[2]) / (1.0 - c[3] - c[4]);
        assert!((dc - powf(10.0, -6.0 / 20.0)).abs() < 1e-2);
    }

    #[test]
    fn cascade_equals_repeated_single_stage() {
        let (mut fast, mut bulk) = regions();
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut cascade = BiquadFilter::create(&mut arena, SR, 3).unwrap();
        let mut single = BiquadFilter::create(&mut arena, SR, 1).unwrap();
        cascade.set_low_pass(800.0, BUTTERWORTH_Q);
        single.set_low_pass(800.0, BUTTERWORTH_Q);

        let mut a: Vec<f32> = (0..512).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        let mut b = a.clone();
        cascade.process(&mut a);
        for _ in 0..3 {
            single.reset();
            single.process(&mut b);
        }
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-6);
        }

        // Steady state: a constant input settles at the DC gain of all sections.
        let mut step = vec![1.0f32; 4096];
        cascade.reset();
        cascade.process(&mut step);
        assert!((step[4095] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn stages_are_replicated() {
        let (mut fast, mut bulk) = regions();
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut filter = BiquadFilter::create(&mut arena, SR, 4).unwrap();
        filter.set_notch(1_000.0, 2.0);
        let c = filter.coefficients();
        for stage in c.chunks_exact(COEFFICIENTS_PER_STAGE).skip(1) {
            assert_eq!(stage, &c[..COEFFICIENTS_PER_STAGE]);
        }
    }

    #[test]
    fn sample_and_block_paths_agree() {
        let (mut fast, mut bulk) = regions();
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut a = BiquadFilter::create(&mut arena, SR, 2).unwrap();
        let mut b = BiquadFilter::create(&mut arena, SR, 2).unwrap();
        a.set_band_pass(1_200.0, 1.5);
        b.copy_coefficients(&a.coefficients()[..5]);

        let input: Vec<f32> = (0..64).map(|i| libm::sinf(i as f32 * 0.3)).collect();
        let mut block = input.clone();
        a.process(&mut block);
        for (i, &x) in input.iter().enumerate() {
            assert!((b.process_sample(x) - block[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn varying_cutoff_with_constant_track_matches_fixed() {
        let (mut fast, mut bulk) = regions();
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut a = BiquadFilter::create(&mut arena, SR, 1).unwrap();
        let mut b = BiquadFilter::create(&mut arena, SR, 1).unwrap();
        let input: Vec<f32> = (0..32).map(|i| (i % 5) as f32 - 2.0).collect();
        let fc = vec![2_000.0f32; 32];
        let mut out = vec![0.0f32; 32];
        a.process_low_pass(&input, &fc, BUTTERWORTH_Q, &mut out);
        b.set_low_pass(2_000.0, BUTTERWORTH_Q);
        let mut expected = vec![0.0f32; 32];
        b.process_into(&input, &mut expected);
        assert_eq!(out, expected);
    }

    #[test]
    fn stereo_channels_share_coefficients_but_not_state() {
        let (mut fast, mut bulk) = regions();
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut filter = StereoBiquadFilter::create(&mut arena, SR, 2).unwrap();
        filter.set_low_pass(1_000.0, BUTTERWORTH_Q);

        let mut buffer = SampleBuffer::<2>::create(&mut arena, 16).unwrap();
        buffer.samples(0).set_all(1.0);
        filter.process(&mut buffer);
        assert!(buffer.samples_ref(1).iter().all(|&x| x == 0.0));
        assert!(filter.channel(0).unwrap().state().iter().any(|&s| s != 0.0));
        assert!(filter.channel(1).unwrap().state().iter().all(|&s| s == 0.0));
        assert!(filter.channel(2).is_none());

        filter.set_high_pass(1_000.0, BUTTERWORTH_Q);
        let left = filter.channel(0).unwrap().state().to_vec();
        assert!(left.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn stage_view_tunes_in_hz() {
        let (mut fast, mut bulk) = regions();
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut filter = BiquadFilter::create(&mut arena, SR, 2).unwrap();
        filter.stage(1).set_peak(1_000.0, 1.0, 3.0, SR);
        let mut expected = [0.0f32; 5];
        set_peak(&mut expected, omega(1_000.0, SR), 1.0, 3.0);
        assert_eq!(&filter.coefficients()[5..], &expected);
        assert!(filter.coefficients()[..5].iter().all(|&c| c == 0.0));
    }
}
