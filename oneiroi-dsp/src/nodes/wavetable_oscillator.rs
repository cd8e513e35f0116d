//! Wavetable voice that scans the looper tape.
//!
//! The tape is cut into consecutive single-cycle frames of
//! [`FRAME_SIZE`] samples. Detune selects the position across frames and
//! neighbouring frames are crossfaded, so whatever was recorded last becomes
//! the oscillator's timbre.

use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::dsp::helpers::crossfade;
use crate::patch::Patch;

pub const FRAME_SIZE: usize = 512;

pub struct StereoWaveTableOscillator {
    sample_rate: f32,
    phase: [f32; 2],
}

#[inline]
fn read_frame(table: &[f32], frame: usize, phase: f32) -> f32 {
    let base = frame * FRAME_SIZE;
    let pos = phase * FRAME_SIZE as f32;
    let idx = (pos as usize).min(FRAME_SIZE - 1);
    let frac = pos - idx as f32;
    let a = table[base + idx];
    let b = table[base + (idx + 1) % FRAME_SIZE];
    a + frac * (b - a)
}

impl StereoWaveTableOscillator {
    pub fn new(config: &EngineConfig) -> Self {
        StereoWaveTableOscillator {
            sample_rate: config.sample_rate,
            phase: [0.0; 2],
        }
    }

    /// Number of whole frames `table` holds.
    pub fn frames(table: &[f32]) -> usize {
        table.len() / FRAME_SIZE
    }

    /// Render from `tables` (left, right); silent when the tape is shorter
    /// than one frame.
    pub fn generate(&mut self, patch: &Patch, tables: (&[f32], &[f32]), output: &mut StereoBuffer<'_>) {
        let c = &patch.ctrls;
        let frames = Self::frames(tables.0).min(Self::frames(tables.1));
        if frames == 0 {
            output.clear();
            return;
        }
        let position = patch.modulated_unit(
            0.5 * (c.osc_detune + 1.0),
            c.osc_detune_mod_amount,
            patch.cvs.osc_detune,
            c.osc_detune_cv_amount,
        ) * (frames - 1) as f32;
        let lower = position as usize;
        let upper = (lower + 1).min(frames - 1);
        let blend = position - lower as f32;

        let pitch = c.osc_pitch
            * libm::exp2f(patch.cvs.osc_pitch * c.osc_pitch_cv_amount)
            * (1.0 + patch.state.mod_value * c.osc_pitch_mod_amount);
        let increments = [
            (pitch / self.sample_rate).clamp(0.0, 0.5),
            (pitch * (1.0 + c.osc_unison) / self.sample_rate).clamp(0.0, 0.5),
        ];

        let (left, right) = output.stereo_mut();
        let channels = [(left, tables.0), (right, tables.1)];
        for (ch, (samples, table)) in channels.into_iter().enumerate() {
            let mut phase = self.phase[ch];
            for s in samples.iter_mut() {
                let a = read_frame(table, lower, phase);
                let b = read_frame(table, upper, phase);
                *s = crossfade(a, b, blend) * c.osc2_vol;
                phase += increments[ch];
                if phase >= 1.0 {
                    phase -= 1.0;
                }
            }
            self.phase[ch] = phase;
        }
    }
}
