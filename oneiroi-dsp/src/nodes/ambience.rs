//! Reverb.
//!
//! Each input channel passes through two Schroeder all-passes and then feeds
//! a four-line feedback delay network mixed by a 4×4 Hadamard matrix. Every
//! line has a one-pole low-pass in its loop. Spacetime scales the line
//! lengths, decay sets the loop gain.

use crate::arena::Arena;
use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::dsp::helpers::OnePole;
use crate::dsp::DelayLine;
use crate::error::Result;
use crate::node::StereoProcessor;
use crate::patch::Patch;

/// Network line lengths at 48 kHz and full size.
const LINE_LENGTHS: [usize; 4] = [1433, 1601, 1867, 2053];
/// Diffuser lengths at 48 kHz, two per channel.
const DIFFUSER_LENGTHS: [[usize; 2]; 2] = [[225, 341], [241, 359]];
const DIFFUSER_GAIN: f32 = 0.6;
const MIN_SIZE: f32 = 0.25;
const MIN_FEEDBACK: f32 = 0.3;
const MAX_FEEDBACK: f32 = 0.97;
const DAMPING_HZ: f32 = 5_000.0;

fn scaled(len: usize, rate_scale: f32) -> usize {
    ((len as f32 * rate_scale) as usize).max(2)
}

/// Orthogonal when scaled by ½.
#[inline]
fn hadamard4(x: &mut [f32; 4]) {
    let [a, b, c, d] = *x;
    let (s0, s1, s2, s3) = (a + b, a - b, c + d, c - d);
    *x = [s0 + s2, s1 + s3, s0 - s2, s1 - s3];
}

struct AllPass<'a> {
    line: DelayLine<'a>,
    delay: usize,
}

impl<'a> AllPass<'a> {
    fn create(arena: &mut Arena<'a>, delay: usize) -> Result<Self> {
        Ok(AllPass {
            line: DelayLine::create(arena, delay)?,
            delay,
        })
    }

    #[inline]
    fn process(&mut self, x: f32) -> f32 {
        let delayed = self.line.read(self.delay - 1);
        self.line.write(x + DIFFUSER_GAIN * delayed);
        delayed - DIFFUSER_GAIN * x
    }
}

pub struct Ambience<'a> {
    diffusers: [[AllPass<'a>; 2]; 2],
    lines: [DelayLine<'a>; 4],
    damping: [OnePole; 4],
    base_lengths: [usize; 4],
}

impl<'a> Ambience<'a> {
    pub fn create(arena: &mut Arena<'a>, config: &EngineConfig) -> Result<Self> {
        let rate_scale = config.sample_rate / 48_000.0;
        let base_lengths = LINE_LENGTHS.map(|len| scaled(len, rate_scale));
        let d = DIFFUSER_LENGTHS.map(|pair| pair.map(|len| scaled(len, rate_scale)));
        let damping = OnePole::new(DAMPING_HZ.min(0.45 * config.sample_rate), config.sample_rate);
        Ok(Ambience {
            diffusers: [
                [AllPass::create(arena, d[0][0])?, AllPass::create(arena, d[0][1])?],
                [AllPass::create(arena, d[1][0])?, AllPass::create(arena, d[1][1])?],
            ],
            lines: [
                DelayLine::create(arena, base_lengths[0])?,
                DelayLine::create(arena, base_lengths[1])?,
                DelayLine::create(arena, base_lengths[2])?,
                DelayLine::create(arena, base_lengths[3])?,
            ],
            damping: [damping; 4],
            base_lengths,
        })
    }

    /// Loop lengths for a size in `0..=1`.
    pub fn line_lengths(&self, size: f32) -> [usize; 4] {
        let scale = MIN_SIZE + (1.0 - MIN_SIZE) * size.clamp(0.0, 1.0);
        self.base_lengths.map(|len| ((len as f32 * scale) as usize).clamp(1, len))
    }

    /// Loop gain for a decay in `0..=1`.
    pub fn feedback(decay: f32) -> f32 {
        MIN_FEEDBACK + (MAX_FEEDBACK - MIN_FEEDBACK) * decay.clamp(0.0, 1.0)
    }
}

impl StereoProcessor for Ambience<'_> {
    fn process(&mut self, patch: &Patch, buffer: &mut StereoBuffer<'_>) {
        let c = &patch.ctrls;
        let size = patch.modulated_unit(
            c.ambience_spacetime,
            c.ambience_spacetime_mod_amount,
            patch.cvs.ambience_spacetime,
            c.ambience_spacetime_cv_amount,
        );
        let decay = patch.modulated_unit(c.ambience_decay, c.ambience_decay_mod_amount, 0.0, 0.0);
        let feedback = 0.5 * Self::feedback(decay);
        let lengths = self.line_lengths(size);
        let vol = 0.5 * c.ambience_vol;
        let (pan_l, pan_r) = if c.ambience_auto_pan > 0.5 {
            let pan = patch.state.mod_value.clamp(-1.0, 1.0);
            ((1.0 - pan).min(1.0), (1.0 + pan).min(1.0))
        } else {
            (1.0, 1.0)
        };

        let [diff_l, diff_r] = &mut self.diffusers;
        let (left, right) = buffer.stereo_mut();
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mut in_l = *l;
            let mut in_r = *r;
            for d in diff_l.iter_mut() {
                in_l = d.process(in_l);
            }
            for d in diff_r.iter_mut() {
                in_r = d.process(in_r);
            }

            let mut taps = [0.0f32; 4];
            for (i, tap) in taps.iter_mut().enumerate() {
                *tap = self.lines[i].read(lengths[i] - 1);
            }
            let mut mix = [0.0f32; 4];
            for (i, m) in mix.iter_mut().enumerate() {
                *m = self.damping[i].process(taps[i]);
            }
            hadamard4(&mut mix);
            let inputs = [in_l, in_l, in_r, in_r];
            for (i, line) in self.lines.iter_mut().enumerate() {
                line.write(inputs[i] + feedback * mix[i]);
            }

            *l += (taps[0] + taps[2]) * vol * pan_l;
            *r += (taps[1] + taps[3]) * vol * pan_r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::testing::{regions, small_config};

    #[test]
    fn hadamard_is_orthogonal_after_scaling() {
        let mut x = [1.0, 2.0, 3.0, 4.0];
        let energy: f32 = x.iter().map(|v| v * v).sum();
        hadamard4(&mut x);
        let mixed: f32 = x.iter().map(|v| 0.25 * v * v).sum();
        assert!((energy - mixed).abs() < 1e-4);
        hadamard4(&mut x);
        assert_eq!(x.map(|v| v * 0.25), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn size_and_decay_ranges() {
        let (mut fast, mut bulk) = regions(256 * 1024);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let amb = Ambience::create(&mut arena, &small_config()).unwrap();
        assert_eq!(amb.line_lengths(1.0), LINE_LENGTHS);
        assert!(amb.line_lengths(0.0)[3] < LINE_LENGTHS[0]);
        assert_eq!(Ambience::feedback(0.0), MIN_FEEDBACK);
        assert!((Ambience::feedback(1.0) - MAX_FEEDBACK).abs() < 1e-6);
    }

    #[test]
    fn impulse_tail_decays() {
        let (mut fast, mut bulk) = regions(256 * 1024);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let config = small_config();
        let mut amb = Ambience::create(&mut arena, &config).unwrap();
        let mut buf = StereoBuffer::create(&mut arena, config.max_block_size).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.ambience_vol = 1.0;
        patch.ctrls.ambience_decay = 0.5;

        let mut energy = std::vec::Vec::new();
        for block in 0..3000 {
            buf.clear();
            if block == 0 {
                buf.samples(0)[0] = 1.0;
            }
            amb.process(&patch, &mut buf);
            let e: f32 = buf.left().iter().chain(buf.right()).map(|s| s * s).sum();
            energy.push(e);
        }
        let early: f32 = energy[100..400].iter().sum();
        let late: f32 = energy[2700..3000].iter().sum();
        assert!(early > 0.0);
        assert!(late < early * 1e-3);
        assert!(energy.iter().all(|e| e.is_finite()));
    }

    #[test]
    fn auto_pan_follows_lfo() {
        let (mut fast, mut bulk) = regions(256 * 1024);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let config = small_config();
        let mut amb = Ambience::create(&mut arena, &config).unwrap();
        let mut buf = StereoBuffer::create(&mut arena, config.max_block_size).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.ambience_vol = 1.0;
        patch.ctrls.ambience_auto_pan = 1.0;
        patch.state.mod_value = -1.0;
        let mut right_energy = 0.0;
        for block in 0..200 {
            buf.clear();
            if block == 0 {
                buf.samples(0)[0] = 1.0;
                buf.samples(1)[0] = 1.0;
            }
            amb.process(&patch, &mut buf);
            if block > 0 {
                right_energy += buf.right().iter().map(|s| s * s).sum::<f32>();
            }
        }
        assert_eq!(right_energy, 0.0);
    }
}
