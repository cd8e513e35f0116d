//! Tuned feedback comb pair.

use crate::arena::Arena;
use crate::array::softclip_sample;
use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::dsp::helpers::{semitones_to_ratio, OnePole};
use crate::dsp::DelayLine;
use crate::error::Result;
use crate::node::StereoProcessor;
use crate::patch::Patch;

/// Interval the right channel is pulled up by at full dissonance.
const DISSONANCE_SEMITONES: f32 = 1.0;
const DAMPING_HZ: f32 = 6_000.0;
const MIN_FEEDBACK: f32 = 0.5;
const MAX_FEEDBACK: f32 = 0.995;
/// Lowest loop frequency; sizes the delay lines.
pub const MIN_FREQUENCY_HZ: f32 = 20.0;

/// Two combs tuned to the oscillator pitch (offset by the tune control).
///
/// A one-pole low-pass in each loop darkens the decay and a soft clip on the
/// write keeps high feedback from running away.
pub struct Resonator<'a> {
    lines: [DelayLine<'a>; 2],
    damping: [OnePole; 2],
    sample_rate: f32,
}

impl<'a> Resonator<'a> {
    pub fn create(arena: &mut Arena<'a>, config: &EngineConfig) -> Result<Self> {
        let damping = OnePole::new(DAMPING_HZ.min(0.45 * config.sample_rate), config.sample_rate);
        let frames = DelayLine::frames_for(MIN_FREQUENCY_HZ, config.sample_rate);
        Ok(Resonator {
            lines: [
                DelayLine::create(arena, frames)?,
                DelayLine::create(arena, frames)?,
            ],
            damping: [damping; 2],
            sample_rate: config.sample_rate,
        })
    }

    /// Loop lengths in samples for the current controls.
    pub fn periods(&self, patch: &Patch) -> [f32; 2] {
        let c = &patch.ctrls;
        let tune = patch
            .modulated(
                c.resonator_tune,
                c.resonator_tune_mod_amount,
                patch.cvs.resonator_tune,
                c.resonator_tune_cv_amount,
            )
            .clamp(-2.0, 2.0);
        let freq = (c.osc_pitch * libm::exp2f(tune)).max(MIN_FREQUENCY_HZ);
        let period = self.sample_rate / freq;
        let ratio = semitones_to_ratio(c.resonator_dissonance.clamp(0.0, 1.0) * DISSONANCE_SEMITONES);
        [period, period / ratio]
    }
}

impl StereoProcessor for Resonator<'_> {
    fn process(&mut self, patch: &Patch, buffer: &mut StereoBuffer<'_>) {
        let c = &patch.ctrls;
        let periods = self.periods(patch);
        let amount = patch.modulated_unit(
            c.resonator_feedback,
            c.resonator_feedback_mod_amount,
            0.0,
            0.0,
        );
        let feedback = MIN_FEEDBACK + (MAX_FEEDBACK - MIN_FEEDBACK) * amount;
        let makeup = 1.0 - feedback;
        let vol = c.resonator_vol;

        let (left, right) = buffer.stereo_mut();
        let channels = self.lines.iter_mut().zip(self.damping.iter_mut());
        for (ch, ((line, damping), samples)) in channels.zip([left, right]).enumerate() {
            let delay = (periods[ch] - 1.0).max(0.0);
            for s in samples.iter_mut() {
                let x = *s;
                let y = x + feedback * damping.process(line.read_frac(delay));
                line.write(softclip_sample(y));
                *s = x + (y * makeup - x) * vol;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::testing::{regions, small_config};

    #[test]
    fn tracks_oscillator_pitch() {
        let (mut fast, mut bulk) = regions(64 * 1024);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let config = small_config();
        let res = Resonator::create(&mut arena, &config).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.osc_pitch = 480.0;
        assert!((res.periods(&patch)[0] - 100.0).abs() < 1e-3);
        patch.ctrls.resonator_tune = 1.0;
        assert!((res.periods(&patch)[0] - 50.0).abs() < 1e-3);
        patch.ctrls.resonator_dissonance = 1.0;
        let [l, r] = res.periods(&patch);
        assert!(r < l);
    }

    #[test]
    fn low_pitches_stop_at_the_floor_and_fit_the_lines() {
        for sample_rate in [48_000.0, 96_000.0] {
            let (mut fast, mut bulk) = regions(64 * 1024);
            let mut arena = Arena::new(&mut fast, &mut bulk);
            let config = EngineConfig {
                sample_rate,
                ..small_config()
            };
            let res = Resonator::create(&mut arena, &config).unwrap();
            let mut patch = Patch::new(&config);
            patch.ctrls.osc_pitch = 3.0;
            patch.ctrls.resonator_tune = -2.0;
            let [left, right] = res.periods(&patch);
            assert!((left - sample_rate / MIN_FREQUENCY_HZ).abs() < 1e-2);
            for (period, line) in [left, right].iter().zip(&res.lines) {
                assert!(period - 1.0 <= line.max_delay() as f32);
            }
        }
    }

    #[test]
    fn impulse_returns_after_one_period() {
        let (mut fast, mut bulk) = regions(64 * 1024);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let config = small_config();
        let mut res = Resonator::create(&mut arena, &config).unwrap();
        let mut buf = StereoBuffer::create(&mut arena, config.max_block_size).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.resonator_vol = 1.0;
        patch.ctrls.resonator_feedback = 1.0;
        // 2.4 kHz: a 20-sample loop.
        patch.ctrls.osc_pitch = 2_400.0;
        buf.samples(0)[0] = 1.0;
        buf.samples(1)[0] = 1.0;
        res.process(&patch, &mut buf);
        let left = buf.left();
        let before = left[10].abs();
        assert!(left[20].abs() > before + 1e-4);
        assert!(left[20].abs() < left[0].abs());
    }
}
