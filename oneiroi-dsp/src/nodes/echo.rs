//! Ping-pong echo.

use crate::arena::Arena;
use crate::array::softclip_sample;
use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::dsp::helpers::{map_expo, Tilt};
use crate::dsp::DelayLine;
use crate::error::Result;
use crate::node::StereoProcessor;
use crate::patch::{ClockSource, Patch};

const MAX_FEEDBACK: f32 = 0.98;
/// Per-sample glide of the delay time towards its target.
const DELAY_GLIDE: f32 = 0.0005;
const TILT_SPLIT_HZ: f32 = 1_200.0;

/// Clock-synced delay times as multiples of the clock period.
pub const SYNC_DIVISIONS: [f32; 7] = [0.25, 1.0 / 3.0, 0.5, 2.0 / 3.0, 1.0, 1.5, 2.0];

/// Stereo ping-pong delay.
///
/// The mono sum of the input feeds the left line; each line's output feeds
/// the other through a tilt filter, so repeats alternate sides. With an
/// external clock the delay snaps to [`SYNC_DIVISIONS`] of the clock period.
pub struct Echo<'a> {
    lines: [DelayLine<'a>; 2],
    tilts: [Tilt; 2],
    sample_rate: f32,
    delay: f32,
    primed: bool,
}

impl<'a> Echo<'a> {
    pub fn create(arena: &mut Arena<'a>, config: &EngineConfig) -> Result<Self> {
        let tilt = Tilt::new(TILT_SPLIT_HZ, config.sample_rate);
        Ok(Echo {
            lines: [
                DelayLine::create(arena, config.echo_frames)?,
                DelayLine::create(arena, config.echo_frames)?,
            ],
            tilts: [tilt; 2],
            sample_rate: config.sample_rate,
            delay: 0.0,
            primed: false,
        })
    }

    fn max_delay(&self) -> f32 {
        self.lines[0].max_delay() as f32
    }

    /// Delay time in samples the controls ask for.
    pub fn target_delay(&self, patch: &Patch) -> f32 {
        let c = &patch.ctrls;
        let density = patch.modulated_unit(
            c.echo_density,
            c.echo_density_mod_amount,
            patch.cvs.echo_density,
            c.echo_density_cv_amount,
        );
        // 1 ms floor.
        let min = (self.sample_rate / 1_000.0).max(1.0);
        let max = self.max_delay();
        let delay = if patch.state.clock_source == ClockSource::External && patch.state.clock_period > 0.0 {
            let last = SYNC_DIVISIONS.len() - 1;
            let idx = ((density * SYNC_DIVISIONS.len() as f32) as usize).min(last);
            patch.state.clock_period * SYNC_DIVISIONS[idx]
        } else {
            min + map_expo(density) * (max - min)
        };
        delay.clamp(min.min(max), max)
    }

    /// Current, possibly still gliding, delay time in samples.
    pub fn delay(&self) -> f32 {
        self.delay
    }
}

impl StereoProcessor for Echo<'_> {
    fn process(&mut self, patch: &Patch, buffer: &mut StereoBuffer<'_>) {
        let c = &patch.ctrls;
        let target = self.target_delay(patch);
        if !self.primed {
            self.delay = target;
            self.primed = true;
        }
        let repeats = patch.modulated_unit(c.echo_repeats, c.echo_repeats_mod_amount, 0.0, 0.0);
        let feedback = repeats * MAX_FEEDBACK;
        for tilt in self.tilts.iter_mut() {
            tilt.set_tilt(c.echo_filter);
        }
        let vol = c.echo_vol;

        let [line_l, line_r] = &mut self.lines;
        let [tilt_l, tilt_r] = &mut self.tilts;
        let (left, right) = buffer.stereo_mut();
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            self.delay += (target - self.delay) * DELAY_GLIDE;
            let tap = self.delay - 1.0;
            let wet_l = line_l.read_frac(tap);
            let wet_r = line_r.read_frac(tap);
            let (xl, xr) = (*l, *r);
            line_l.write(softclip_sample(0.5 * (xl + xr) + feedback * tilt_l.process(wet_r)));
            line_r.write(softclip_sample(feedback * tilt_r.process(wet_l)));
            *l = xl + wet_l * vol;
            *r = xr + wet_r * vol;
        }
    }
}
