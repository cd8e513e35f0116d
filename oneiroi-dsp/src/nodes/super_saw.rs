//! Detuned poly-BLEP saw stack.

use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::dsp::helpers::semitones_to_ratio;
use crate::dsp::XorShift32;
use crate::node::StereoGenerator;
use crate::patch::Patch;

const VOICES: usize = 3;

/// Largest voice offset in semitones at full detune.
const SPREAD_SEMITONES: f32 = 0.3;

/// Per-voice offsets as a fraction of the spread.
const LEFT_SPREAD: [f32; VOICES] = [-1.0, 0.0, 0.66];
const RIGHT_SPREAD: [f32; VOICES] = [-0.66, 0.0, 1.0];

/// Naive saw minus a two-sample polynomial step at the wrap.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[inline]
fn saw(phase: f32, dt: f32) -> f32 {
    2.0 * phase - 1.0 - poly_blep(phase, dt)
}

#[derive(Clone, Copy, Debug, Default)]
struct Voice {
    phase: f32,
    increment: f32,
}

impl Voice {
    #[inline]
    fn next(&mut self) -> f32 {
        let out = saw(self.phase, self.increment);
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }
}

/// Three saws per channel with free-running, randomly seeded phases.
pub struct StereoSuperSaw {
    sample_rate: f32,
    voices: [[Voice; VOICES]; 2],
}

impl StereoSuperSaw {
    pub fn new(config: &EngineConfig) -> Self {
        let mut rng = XorShift32::default();
        let mut voices = [[Voice::default(); VOICES]; 2];
        for voice in voices.iter_mut().flatten() {
            voice.phase = rng.next_f32();
        }
        StereoSuperSaw {
            sample_rate: config.sample_rate,
            voices,
        }
    }

    fn tune(&mut self, pitch: f32, spread: f32, unison: f32) {
        let inv_sr = 1.0 / self.sample_rate;
        for (k, voice) in self.voices[0].iter_mut().enumerate() {
            voice.increment = (pitch * semitones_to_ratio(LEFT_SPREAD[k] * spread) * inv_sr).min(0.5);
        }
        for (k, voice) in self.voices[1].iter_mut().enumerate() {
            voice.increment =
                (pitch * semitones_to_ratio(RIGHT_SPREAD[k] * spread) * (1.0 + unison) * inv_sr).min(0.5);
        }
    }
}

impl StereoGenerator for StereoSuperSaw {
    fn generate(&mut self, patch: &Patch, output: &mut StereoBuffer<'_>) {
        let c = &patch.ctrls;
        let pitch = c.osc_pitch
            * libm::exp2f(patch.cvs.osc_pitch * c.osc_pitch_cv_amount)
            * (1.0 + patch.state.mod_value * c.osc_pitch_mod_amount);
        let detune = patch
            .modulated(
                c.osc_detune,
                c.osc_detune_mod_amount,
                patch.cvs.osc_detune,
                c.osc_detune_cv_amount,
            )
            .clamp(-1.0, 1.0);
        self.tune(pitch.max(0.0), libm::fabsf(detune) * SPREAD_SEMITONES, c.osc_unison);

        let gain = c.osc2_vol / VOICES as f32;
        let (left, right) = output.stereo_mut();
        for (voices, samples) in self.voices.iter_mut().zip([left, right]) {
            for s in samples.iter_mut() {
                let mut sum = 0.0;
                for voice in voices.iter_mut() {
                    sum += voice.next();
                }
                *s = sum * gain;
            }
        }
    }
}
