//! Block-rate LFO.

use core::f32::consts::TAU;

use crate::config::EngineConfig;
use crate::dsp::helpers::crossfade;
use crate::dsp::{fast_sin, XorShift32};
use crate::node::ControlStage;
use crate::patch::{ClockSource, Patch};

const MIN_HZ: f32 = 0.05;
/// Octaves above [`MIN_HZ`] at full speed.
const SPEED_OCTAVES: f32 = 8.0;
/// `mod_type` value that selects the last shape.
const TYPE_RANGE: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Sine,
    Triangle,
    Saw,
    Square,
    SampleAndHold,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Sine,
        Shape::Triangle,
        Shape::Saw,
        Shape::Square,
        Shape::SampleAndHold,
    ];

    /// Bipolar value at `phase` in `0..1`.
    pub fn value(self, phase: f32, held: f32) -> f32 {
        match self {
            Shape::Sine => fast_sin(TAU * phase),
            Shape::Triangle => 1.0 - 4.0 * libm::fabsf(phase - 0.5),
            Shape::Saw => 2.0 * phase - 1.0,
            Shape::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Shape::SampleAndHold => held,
        }
    }
}

/// Morphing LFO that publishes `state.mod_value` once per block.
///
/// `mod_type` sweeps continuously through [`Shape::ALL`], crossfading
/// neighbours. A new random level is drawn for sample-and-hold every cycle.
/// Ticks from an external clock restart the cycle.
pub struct Modulation {
    sample_rate: f32,
    phase: f32,
    held: f32,
    rng: XorShift32,
}

impl Modulation {
    pub fn new(config: &EngineConfig) -> Self {
        Modulation {
            sample_rate: config.sample_rate,
            phase: 0.0,
            held: 0.0,
            rng: XorShift32::default(),
        }
    }

    pub fn frequency(speed: f32) -> f32 {
        MIN_HZ * libm::exp2f(speed.clamp(0.0, 1.0) * SPEED_OCTAVES)
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Unscaled output for a given `mod_type`.
    pub fn shape_value(&self, mod_type: f32) -> f32 {
        let last = Shape::ALL.len() - 1;
        let morph = (mod_type / TYPE_RANGE).clamp(0.0, 1.0) * last as f32;
        let lower = (morph as usize).min(last - 1);
        let t = morph - lower as f32;
        let a = Shape::ALL[lower].value(self.phase, self.held);
        let b = Shape::ALL[lower + 1].value(self.phase, self.held);
        crossfade(a, b, t)
    }
}

impl ControlStage for Modulation {
    fn process(&mut self, patch: &mut Patch, frames: usize) {
        if patch.state.clock_source == ClockSource::External && patch.state.clock_tick {
            self.phase = 0.0;
            self.held = self.rng.next_bipolar();
        }
        self.phase += Self::frequency(patch.ctrls.mod_speed) * frames as f32 / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= libm::floorf(self.phase);
            self.held = self.rng.next_bipolar();
        }
        patch.state.mod_value = self.shape_value(patch.ctrls.mod_type) * patch.ctrls.mod_level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::testing::small_config;

    #[test]
    fn shapes_at_quarter_phase() {
        assert!((Shape::Sine.value(0.25, 0.0) - 1.0).abs() < 1e-4);
        assert_eq!(Shape::Triangle.value(0.5, 0.0), 1.0);
        assert_eq!(Shape::Triangle.value(0.0, 0.0), -1.0);
        assert_eq!(Shape::Saw.value(0.75, 0.0), 0.5);
        assert_eq!(Shape::Square.value(0.75, 0.0), -1.0);
        assert_eq!(Shape::SampleAndHold.value(0.3, 0.42), 0.42);
    }

    #[test]
    fn speed_range() {
        assert_eq!(Modulation::frequency(0.0), MIN_HZ);
        assert!((Modulation::frequency(1.0) - 12.8).abs() < 1e-4);
    }

    #[test]
    fn publishes_scaled_value() {
        let config = small_config();
        let mut patch = Patch::new(&config);
        let mut lfo = Modulation::new(&config);
        patch.ctrls.mod_type = 0.2; // pure triangle
        patch.ctrls.mod_level = 0.5;
        patch.ctrls.mod_speed = 1.0;
        let mut peak = 0.0f32;
        for _ in 0..1_000 {
            lfo.process(&mut patch, config.max_block_size);
            assert!((0.0..1.0).contains(&lfo.phase()));
            peak = peak.max(patch.state.mod_value.abs());
        }
        assert!(peak <= 0.5 + 1e-6);
        assert!(peak > 0.45);
    }

    #[test]
    fn external_tick_restarts_cycle() {
        let config = small_config();
        let mut patch = Patch::new(&config);
        let mut lfo = Modulation::new(&config);
        patch.ctrls.mod_level = 1.0;
        for _ in 0..10 {
            lfo.process(&mut patch, 32);
        }
        assert!(lfo.phase() > 0.0);
        patch.state.clock_source = ClockSource::External;
        patch.state.clock_tick = true;
        lfo.process(&mut patch, 32);
        let expected = Modulation::frequency(patch.ctrls.mod_speed) * 32.0 / config.sample_rate;
        assert!((lfo.phase() - expected).abs() < 1e-6);
    }
}
