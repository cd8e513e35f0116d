//! Multi-mode stereo filter.

use crate::arena::Arena;
use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::dsp::{DelayLine, StereoBiquadFilter};
use crate::error::Result;
use crate::node::StereoProcessor;
use crate::patch::Patch;

/// Cutoff at full knob travel.
pub const MAX_CUTOFF_HZ: f32 = 22_000.0;
pub const MIN_CUTOFF_HZ: f32 = 20.0;

const COMB_MAX_FEEDBACK: f32 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterMode {
    LowPass,
    BandPass,
    HighPass,
    Comb,
}

impl FilterMode {
    /// Four equal bands over `0..1`.
    pub fn from_control(x: f32) -> Self {
        if x < 0.25 {
            FilterMode::LowPass
        } else if x < 0.5 {
            FilterMode::BandPass
        } else if x < 0.75 {
            FilterMode::HighPass
        } else {
            FilterMode::Comb
        }
    }
}

/// Shared-coefficient stereo biquad with a feedback comb as fourth mode.
///
/// The wet signal is crossfaded against the dry one by `filter_vol`.
pub struct Filter<'a> {
    biquad: StereoBiquadFilter<'a>,
    combs: [DelayLine<'a>; 2],
    sample_rate: f32,
    mode: FilterMode,
}

impl<'a> Filter<'a> {
    pub fn create(arena: &mut Arena<'a>, config: &EngineConfig) -> Result<Self> {
        // Room for the comb period at the lowest cutoff.
        let comb_frames = DelayLine::frames_for(MIN_CUTOFF_HZ, config.sample_rate);
        Ok(Filter {
            biquad: StereoBiquadFilter::create(arena, config.sample_rate, 1)?,
            combs: [
                DelayLine::create(arena, comb_frames)?,
                DelayLine::create(arena, comb_frames)?,
            ],
            sample_rate: config.sample_rate,
            mode: FilterMode::LowPass,
        })
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Cutoff in Hz for a normalised control.
    pub fn cutoff_hz(&self, cutoff: f32) -> f32 {
        (cutoff * MAX_CUTOFF_HZ).clamp(MIN_CUTOFF_HZ, 0.45 * self.sample_rate)
    }

    fn process_comb(&mut self, buffer: &mut StereoBuffer<'_>, fc: f32, resonance: f32, vol: f32) {
        let delay = (self.sample_rate / fc - 1.0).max(0.0);
        let feedback = resonance * COMB_MAX_FEEDBACK;
        let makeup = 1.0 - feedback;
        let (left, right) = buffer.stereo_mut();
        for (line, samples) in self.combs.iter_mut().zip([left, right]) {
            for s in samples.iter_mut() {
                let x = *s;
                let y = x + feedback * line.read_frac(delay);
                line.write(y);
                *s = x + (y * makeup - x) * vol;
            }
        }
    }
}

impl StereoProcessor for Filter<'_> {
    fn process(&mut self, patch: &Patch, buffer: &mut StereoBuffer<'_>) {
        let c = &patch.ctrls;
        let mode = FilterMode::from_control(c.filter_mode);
        if mode != self.mode {
            self.biquad.reset();
            self.mode = mode;
        }
        let cutoff = patch.modulated_unit(
            c.filter_cutoff,
            c.filter_cutoff_mod_amount,
            patch.cvs.filter_cutoff,
            c.filter_cutoff_cv_amount,
        );
        let resonance = patch.modulated_unit(
            c.filter_resonance,
            c.filter_resonance_mod_amount,
            patch.cvs.filter_resonance,
            c.filter_resonance_cv_amount,
        );
        let fc = self.cutoff_hz(cutoff);
        let q = 0.5 + 9.5 * resonance;
        let vol = c.filter_vol;

        match mode {
            FilterMode::LowPass => self.biquad.set_low_pass(fc, q),
            FilterMode::BandPass => self.biquad.set_band_pass(fc, q),
            FilterMode::HighPass => self.biquad.set_high_pass(fc, q),
            FilterMode::Comb => {
                self.process_comb(buffer, fc, resonance, vol);
                return;
            }
        }

        let (left, right) = buffer.stereo_mut();
        for (ch, samples) in [left, right].into_iter().enumerate() {
            if let Some(mut worker) = self.biquad.channel(ch) {
                for s in samples.iter_mut() {
                    let x = *s;
                    let wet = worker.process_sample(x);
                    *s = x + (wet - x) * vol;
                }
            }
        }
    }
}
