//! Output limiter.

use crate::buffer::StereoBuffer;
use crate::node::StereoProcessor;
use crate::patch::Patch;

/// Cubic soft limiter: unity gain near zero, saturating to ±1 at ±1.5.
#[derive(Clone, Copy, Debug, Default)]
pub struct Limiter;

impl Limiter {
    pub const fn new() -> Self {
        Limiter
    }

    pub fn process_soft(&mut self, buffer: &mut StereoBuffer<'_>) {
        for ch in 0..buffer.channels() {
            buffer.samples(ch).softclip();
        }
    }

    /// Hard clip to ±1.
    pub fn process_hard(&mut self, buffer: &mut StereoBuffer<'_>) {
        for ch in 0..buffer.channels() {
            buffer.samples(ch).clip();
        }
    }
}

impl StereoProcessor for Limiter {
    fn process(&mut self, _patch: &Patch, buffer: &mut StereoBuffer<'_>) {
        self.process_soft(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    #[test]
    fn soft_and_hard_stay_in_range() {
        let (mut fast, mut bulk) = (vec![0u8; 1024], vec![0u8; 0]);
        let mut arena = Arena::new(&mut fast, &mut bulk);
        let mut buf = StereoBuffer::create(&mut arena, 4).unwrap();
        buf.samples(0).copy_from(&[-4.0, -0.01, 0.01, 4.0]);
        buf.samples(1).copy_from(&[-4.0, -0.01, 0.01, 4.0]);
        let mut limiter = Limiter::new();
        limiter.process_soft(&mut buf);
        assert!((buf.left()[0] + 1.0).abs() < 1e-6);
        assert!((buf.left()[3] - 1.0).abs() < 1e-6);
        assert!((buf.left()[2] - 0.01).abs() < 1e-5);
        buf.samples(1).copy_from(&[-4.0, -0.01, 0.01, 4.0]);
        limiter.process_hard(&mut buf);
        assert_eq!(buf.right(), &[-1.0, -0.01, 0.01, 1.0]);
    }
}
