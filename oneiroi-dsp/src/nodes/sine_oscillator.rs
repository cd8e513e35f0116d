//! Stereo sine voice.

use crate::arena::Arena;
use crate::array::FloatArray;
use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::dsp::helpers::semitones_to_ratio;
use crate::dsp::SineOscillator;
use crate::error::Result;
use crate::node::StereoGenerator;
use crate::patch::Patch;

/// Detune at full knob travel, in semitones between the two channels.
const DETUNE_RANGE: f32 = 0.5;

/// Two table sines, one per channel, frequency-modulated by the LFO.
///
/// Detune spreads the channels symmetrically around the pitch; unison
/// additionally raises the right channel by a small ratio.
pub struct StereoSineOscillator<'a> {
    left: SineOscillator,
    right: SineOscillator,
    fm: &'a mut [f32],
    last_fm: f32,
}

impl<'a> StereoSineOscillator<'a> {
    pub fn create(arena: &mut Arena<'a>, config: &EngineConfig) -> Result<Self> {
        Ok(StereoSineOscillator {
            left: SineOscillator::new(config.sample_rate),
            right: SineOscillator::new(config.sample_rate),
            fm: arena.alloc_floats(config.max_block_size)?,
            last_fm: 0.0,
        })
    }

    pub fn left(&self) -> &SineOscillator {
        &self.left
    }

    pub fn right(&self) -> &SineOscillator {
        &self.right
    }
}

impl StereoGenerator for StereoSineOscillator<'_> {
    fn generate(&mut self, patch: &Patch, output: &mut StereoBuffer<'_>) {
        let c = &patch.ctrls;
        let pitch = c.osc_pitch * libm::exp2f(patch.cvs.osc_pitch * c.osc_pitch_cv_amount);
        let detune = patch
            .modulated(
                c.osc_detune,
                c.osc_detune_mod_amount,
                patch.cvs.osc_detune,
                c.osc_detune_cv_amount,
            )
            .clamp(-1.0, 1.0);
        let spread = 0.5 * detune * DETUNE_RANGE;
        self.left.set_frequency(pitch * semitones_to_ratio(-spread));
        self.right
            .set_frequency(pitch * semitones_to_ratio(spread) * (1.0 + c.osc_unison));

        let frames = output.size().min(self.fm.len());
        let target = patch.state.mod_value * c.osc_pitch_mod_amount;
        let mut fm = FloatArray::new(&mut self.fm[..frames]);
        fm.ramp(self.last_fm, target);
        self.last_fm = target;

        let (left, right) = output.stereo_mut();
        self.left.generate_fm(&mut left[..frames], &fm);
        self.right.generate_fm(&mut right[..frames], &fm);
        for ch in 0..2 {
            output.samples(ch).multiply_scalar(c.osc1_vol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::testing::{regions, small_config};

    #[test]
    fn centred_detune_gives_identical_channels() {
        let (mut fast, mut bulk) = regions(0);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let config = small_config();
        let mut osc = StereoSineOscillator::create(&mut arena, &config).unwrap();
        let mut out = StereoBuffer::create(&mut arena, config.max_block_size).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.osc1_vol = 0.5;
        patch.ctrls.osc_pitch = 1_000.0;
        osc.generate(&patch, &mut out);
        assert_eq!(out.left(), out.right());
        let inc = osc.left().increment();
        for (i, &y) in out.left().iter().enumerate() {
            assert!((y - 0.5 * libm::sinf(inc * i as f32)).abs() < 1e-4);
        }
    }

    #[test]
    fn detune_spreads_channels() {
        let (mut fast, mut bulk) = regions(0);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let config = small_config();
        let mut osc = StereoSineOscillator::create(&mut arena, &config).unwrap();
        let mut out = StereoBuffer::create(&mut arena, config.max_block_size).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.osc1_vol = 1.0;
        patch.ctrls.osc_detune = 1.0;
        osc.generate(&patch, &mut out);
        assert!(osc.left().frequency() < patch.ctrls.osc_pitch);
        assert!(osc.right().frequency() > patch.ctrls.osc_pitch);
        let ratio = osc.right().frequency() / osc.left().frequency();
        assert!((ratio - semitones_to_ratio(DETUNE_RANGE)).abs() < 1e-5);
    }

    #[test]
    fn lfo_bends_pitch() {
        let (mut fast, mut bulk) = regions(0);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let config = small_config();
        let mut plain = StereoSineOscillator::create(&mut arena, &config).unwrap();
        let mut bent = StereoSineOscillator::create(&mut arena, &config).unwrap();
        let mut a = StereoBuffer::create(&mut arena, config.max_block_size).unwrap();
        let mut b = StereoBuffer::create(&mut arena, config.max_block_size).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.osc1_vol = 1.0;
        plain.generate(&patch, &mut a);
        patch.ctrls.osc_pitch_mod_amount = 0.5;
        patch.state.mod_value = 1.0;
        bent.generate(&patch, &mut b);
        assert_eq!(a.left()[0], b.left()[0]);
        assert!(b.left()[31] > a.left()[31]);
    }
}
