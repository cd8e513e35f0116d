//! First-order DC blocker.

use crate::buffer::StereoBuffer;
use crate::node::StereoProcessor;
use crate::patch::Patch;

/// `y[n] = x[n] - x[n-1] + R·y[n-1]` on both channels.
///
/// The pole `R` sets the corner: 0.995 puts it near 38 Hz at 48 kHz.
#[derive(Clone, Copy, Debug)]
pub struct StereoDcBlockingFilter {
    pole: f32,
    x1: [f32; 2],
    y1: [f32; 2],
}

impl StereoDcBlockingFilter {
    pub const DEFAULT_POLE: f32 = 0.995;

    pub const fn new() -> Self {
        Self::with_pole(Self::DEFAULT_POLE)
    }

    pub const fn with_pole(pole: f32) -> Self {
        StereoDcBlockingFilter {
            pole,
            x1: [0.0; 2],
            y1: [0.0; 2],
        }
    }

    pub fn reset(&mut self) {
        self.x1 = [0.0; 2];
        self.y1 = [0.0; 2];
    }

    /// Filter `buffer` in place.
    pub fn process_buffer(&mut self, buffer: &mut StereoBuffer<'_>) {
        let (left, right) = buffer.stereo_mut();
        for (ch, samples) in [left, right].into_iter().enumerate() {
            let mut x1 = self.x1[ch];
            let mut y1 = self.y1[ch];
            for s in samples.iter_mut() {
                let x = *s;
                let y = x - x1 + self.pole * y1;
                x1 = x;
                y1 = y;
                *s = y;
            }
            self.x1[ch] = x1;
            self.y1[ch] = y1;
        }
    }
}

impl Default for StereoDcBlockingFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoProcessor for StereoDcBlockingFilter {
    fn process(&mut self, _patch: &Patch, buffer: &mut StereoBuffer<'_>) {
        self.process_buffer(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    #[test]
    fn removes_constant_offset() {
        let (mut fast, mut bulk) = (vec![0u8; 4096], vec![0u8; 0]);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut buf = StereoBuffer::create(&mut arena, 64).unwrap();
        let mut dc = StereoDcBlockingFilter::new();
        for _ in 0..40 {
            buf.samples(0).set_all(1.0);
            buf.samples(1).set_all(-0.5);
            dc.process_buffer(&mut buf);
        }
        assert!(buf.left()[63].abs() < 1e-3);
        assert!(buf.right()[63].abs() < 1e-3);
    }

    #[test]
    fn first_sample_passes_and_state_carries() {
        let (mut fast, mut bulk) = (vec![0u8; 4096], vec![0u8; 0]);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut buf = StereoBuffer::create(&mut arena, 2).unwrap();
        buf.samples(0).copy_from(&[0.5, 0.5]);
        let mut dc = StereoDcBlockingFilter::with_pole(0.5);
        dc.process_buffer(&mut buf);
        assert_eq!(buf.left(), &[0.5, 0.25]);
        buf.samples(0).copy_from(&[0.5, 0.5]);
        dc.process_buffer(&mut buf);
        assert_eq!(buf.left(), &[0.125, 0.0625]);
    }
}
