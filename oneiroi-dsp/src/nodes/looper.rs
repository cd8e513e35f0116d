//! Stereo tape looper.
//!
//! The tape is a pair of arena slices of `looper_frames` samples. While
//! recording, incoming audio is written at the record head on top of the old
//! tape scaled by the sound-on-sound amount. The play head runs at the speed
//! control (negative plays backwards) inside a window set by start and
//! length, measured over the part of the tape that has been recorded.

use crate::arena::Arena;
use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::dsp::helpers::Tilt;
use crate::error::Result;
use crate::patch::Patch;

const TILT_SPLIT_HZ: f32 = 800.0;
const MAX_SPEED: f32 = 2.0;

pub struct Looper<'a> {
    tape: [&'a mut [f32]; 2],
    tilts: [Tilt; 2],
    write_head: usize,
    recorded: usize,
    play_head: f32,
}

impl<'a> Looper<'a> {
    pub fn create(arena: &mut Arena<'a>, config: &EngineConfig) -> Result<Self> {
        let tilt = Tilt::new(TILT_SPLIT_HZ, config.sample_rate);
        Ok(Looper {
            tape: [
                arena.alloc_floats(config.looper_frames)?,
                arena.alloc_floats(config.looper_frames)?,
            ],
            tilts: [tilt; 2],
            write_head: 0,
            recorded: 0,
            play_head: 0.0,
        })
    }

    /// Both tape channels, recorded or not.
    pub fn tape(&self) -> (&[f32], &[f32]) {
        (&*self.tape[0], &*self.tape[1])
    }

    /// Frames written since construction, up to the tape length.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn write_head(&self) -> usize {
        self.write_head
    }

    /// Play window `(start, length)` in frames; `None` before anything is recorded.
    pub fn window(&self, patch: &Patch) -> Option<(usize, usize)> {
        if self.recorded == 0 {
            return None;
        }
        let c = &patch.ctrls;
        let start = patch.modulated_unit(
            c.looper_start,
            c.looper_start_mod_amount,
            patch.cvs.looper_start,
            c.looper_start_cv_amount,
        );
        let length = patch.modulated_unit(
            c.looper_length,
            c.looper_length_mod_amount,
            patch.cvs.looper_length,
            c.looper_length_cv_amount,
        );
        let start = ((start * self.recorded as f32) as usize).min(self.recorded - 1);
        let length = ((length * self.recorded as f32) as usize).clamp(1, self.recorded - start);
        Some((start, length))
    }

    fn speed(patch: &Patch) -> f32 {
        let c = &patch.ctrls;
        patch
            .modulated(
                c.looper_speed,
                c.looper_speed_mod_amount,
                patch.cvs.looper_speed,
                c.looper_speed_cv_amount,
            )
            .clamp(-MAX_SPEED, MAX_SPEED)
    }

    #[inline]
    fn record(&mut self, frame: [f32; 2], sos: f32) {
        let w = self.write_head;
        for (tape, x) in self.tape.iter_mut().zip(frame) {
            tape[w] = x + tape[w] * sos;
        }
        self.write_head += 1;
        if self.write_head == self.tape[0].len() {
            self.write_head = 0;
            self.recorded = self.tape[0].len();
        } else {
            self.recorded = self.recorded.max(self.write_head);
        }
    }

    #[inline]
    fn play(&mut self, start: usize, length: usize, speed: f32) -> [f32; 2] {
        let len = length as f32;
        let mut pos = libm::fmodf(self.play_head - start as f32, len);
        if pos < 0.0 {
            pos += len;
        }
        if pos >= len {
            pos = 0.0;
        }
        let idx = pos as usize;
        let frac = pos - idx as f32;
        let a = start + idx;
        let b = start + (idx + 1) % length;
        let frame = [0, 1].map(|ch| {
            let tape = &self.tape[ch];
            tape[a] + frac * (tape[b] - tape[a])
        });
        self.play_head = start as f32 + pos + speed;
        frame
    }

    /// Record `input` (when enabled) and write playback into `output`.
    ///
    /// `output` receives only the loop, scaled by the looper volume.
    pub fn process(&mut self, patch: &Patch, input: &StereoBuffer<'_>, output: &mut StereoBuffer<'_>) {
        let c = &patch.ctrls;
        let recording = c.looper_recording > 0.5;
        let sos = c.looper_sos.clamp(0.0, 1.0);
        let speed = Self::speed(patch);
        let vol = c.looper_vol;
        for tilt in self.tilts.iter_mut() {
            tilt.set_tilt(c.looper_filter);
        }

        let frames = output.size().min(input.size());
        let (in_l, in_r) = (input.left(), input.right());
        for i in 0..frames {
            if recording {
                self.record([in_l[i], in_r[i]], sos);
            }
            let frame = match self.window(patch) {
                Some((start, length)) => self.play(start, length, speed),
                None => [0.0; 2],
            };
            let (out_l, out_r) = output.stereo_mut();
            out_l[i] = self.tilts[0].process(frame[0]) * vol;
            out_r[i] = self.tilts[1].process(frame[1]) * vol;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::testing::{regions, small_config};

    fn ramp_input(buf: &mut StereoBuffer<'_>, from: f32) {
        for (i, s) in buf.samples(0).iter_mut().enumerate() {
            *s = from + i as f32;
        }
        for (i, s) in buf.samples(1).iter_mut().enumerate() {
            *s = -(from + i as f32);
        }
    }

    #[test]
    fn silent_until_something_is_recorded() {
        let (mut fast, mut bulk) = regions(64 * 1024);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let config = small_config();
        let mut looper = Looper::create(&mut arena, &config).unwrap();
        let mut input = StereoBuffer::create(&mut arena, 8).unwrap();
        let mut output = StereoBuffer::create(&mut arena, 8).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.looper_vol = 1.0;
        ramp_input(&mut input, 1.0);
        looper.process(&patch, &input, &mut output);
        assert_eq!(output.left(), &[0.0; 8]);
        assert_eq!(looper.recorded(), 0);
    }

    #[test]
    fn records_then_plays_back() {
        let (mut fast, mut bulk) = regions(64 * 1024);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let config = small_config();
        let mut looper = Looper::create(&mut arena, &config).unwrap();
        let mut input = StereoBuffer::create(&mut arena, 8).unwrap();
        let mut output = StereoBuffer::create(&mut arena, 8).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.looper_vol = 1.0;
        patch.ctrls.looper_filter = 0.5;
        patch.ctrls.looper_recording = 1.0;
        ramp_input(&mut input, 1.0);
        looper.process(&patch, &input, &mut output);
        assert_eq!(looper.recorded(), 8);
        assert_eq!(&looper.tape().0[..8], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(&looper.tape().1[..2], &[-1.0, -2.0]);

        patch.ctrls.looper_recording = 0.0;
        input.clear();
        looper.process(&patch, &input, &mut output);
        assert_eq!(looper.recorded(), 8);
        // Flat tilt passes the loop through; the head keeps cycling the window.
        let window: f32 = (1..=8).map(|x| x as f32).sum();
        let played: f32 = output.left().iter().sum();
        assert!((played - window).abs() < 1e-3);
    }

    #[test]
    fn sound_on_sound_keeps_the_old_take() {
        let (mut fast, mut bulk) = regions(64 * 1024);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut config = small_config();
        config.looper_frames = 8;
        let mut looper = Looper::create(&mut arena, &config).unwrap();
        let mut input = StereoBuffer::create(&mut arena, 8).unwrap();
        let mut output = StereoBuffer::create(&mut arena, 8).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.looper_recording = 1.0;
        patch.ctrls.looper_sos = 0.5;
        input.samples(0).set_all(1.0);
        looper.process(&patch, &input, &mut output);
        assert_eq!(looper.write_head(), 0);
        looper.process(&patch, &input, &mut output);
        assert_eq!(looper.tape().0, &[1.5; 8]);
    }

    #[test]
    fn window_and_reverse_playback() {
        let (mut fast, mut bulk) = regions(64 * 1024);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut config = small_config();
        config.looper_frames = 8;
        let mut looper = Looper::create(&mut arena, &config).unwrap();
        let mut input = StereoBuffer::create(&mut arena, 8).unwrap();
        let mut output = StereoBuffer::create(&mut arena, 8).unwrap();
        let mut patch = Patch::new(&config);
        patch.ctrls.looper_recording = 1.0;
        ramp_input(&mut input, 0.0);
        looper.process(&patch, &input, &mut output);

        patch.ctrls.looper_recording = 0.0;
        patch.ctrls.looper_start = 0.5;
        patch.ctrls.looper_length = 0.25;
        assert_eq!(looper.window(&patch), Some((4, 2)));
        patch.ctrls.looper_length = 1.0;
        assert_eq!(looper.window(&patch), Some((4, 4)));

        patch.ctrls.looper_vol = 1.0;
        patch.ctrls.looper_filter = 0.5;
        patch.ctrls.looper_speed = -1.0;
        patch.ctrls.looper_length = 0.5;
        looper.process(&patch, &input, &mut output);
        let out = output.left();
        // Every sample comes from the window 4..8, stepping backwards.
        assert!(out.iter().all(|&s| (3.9..=7.1).contains(&s)));
        assert!((out[1] - out[0] + 1.0).abs() < 1e-3 || (out[1] - out[0] - 3.0).abs() < 1e-3);
    }
}
