//! Arena-backed circular delay line.

use crate::arena::Arena;
use crate::error::Result;

/// Fixed-length circular buffer with integer and fractional taps.
///
/// `read(d)` returns the sample written `d` writes ago, so `read(0)` is the
/// most recent one. Delays are clamped to `len() - 1`.
pub struct DelayLine<'a> {
    buffer: &'a mut [f32],
    write_pos: usize,
}

impl<'a> DelayLine<'a> {
    pub fn create(arena: &mut Arena<'a>, len: usize) -> Result<Self> {
        Ok(Self::new(arena.alloc_floats(len.max(1))?))
    }

    /// Length that can hold one full period of `lowest_hz`.
    pub fn frames_for(lowest_hz: f32, sample_rate: f32) -> usize {
        libm::ceilf(sample_rate / lowest_hz) as usize + 1
    }

    /// Wrap caller-owned storage; must not be empty.
    pub fn new(buffer: &'a mut [f32]) -> Self {
        buffer.fill(0.0);
        DelayLine {
            buffer,
            write_pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Longest usable delay in samples.
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 1
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
        self.buffer[self.write_pos] = sample;
    }

    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay.min(len - 1);
        let idx = if delay <= self.write_pos {
            self.write_pos - delay
        } else {
            self.write_pos + len - delay
        };
        self.buffer[idx]
    }

    /// Linearly interpolated tap.
    #[inline]
    pub fn read_frac(&self, delay: f32) -> f32 {
        let max = self.max_delay() as f32;
        let delay = delay.clamp(0.0, max);
        let whole = delay as usize;
        let frac = delay - whole as f32;
        let a = self.read(whole);
        let b = self.read(whole + 1);
        a + frac * (b - a)
    }

    /// Read at `delay`, then write `sample`.
    #[inline]
    pub fn tap_and_write(&mut self, delay: usize, sample: f32) -> f32 {
        let out = self.read(delay);
        self.write(sample);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_taps() {
        let mut storage = [0.0f32; 4];
        let mut line = DelayLine::new(&mut storage);
        for x in 1..=3 {
            line.write(x as f32);
        }
        assert_eq!(line.read(0), 3.0);
        assert_eq!(line.read(1), 2.0);
        assert_eq!(line.read(2), 1.0);
        assert_eq!(line.read(3), 0.0);
        // Clamped to the last slot.
        assert_eq!(line.read(10), 0.0);
    }

    #[test]
    fn wraps_around() {
        let mut storage = [0.0f32; 3];
        let mut line = DelayLine::new(&mut storage);
        for x in 1..=7 {
            line.write(x as f32);
        }
        assert_eq!(line.read(0), 7.0);
        assert_eq!(line.read(2), 5.0);
    }

    #[test]
    fn fractional_tap_interpolates() {
        let mut storage = [0.0f32; 8];
        let mut line = DelayLine::new(&mut storage);
        line.write(0.0);
        line.write(1.0);
        assert!((line.read_frac(0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn frames_for_fits_one_period() {
        assert_eq!(DelayLine::frames_for(20.0, 48_000.0), 2401);
        assert_eq!(DelayLine::frames_for(440.0, 44_100.0), 102);
    }

    #[test]
    fn tap_then_write() {
        let mut storage = [0.0f32; 3];
        let mut line = DelayLine::new(&mut storage);
        assert_eq!(line.tap_and_write(1, 5.0), 0.0);
        assert_eq!(line.tap_and_write(0, 6.0), 5.0);
        line.clear();
        assert_eq!(line.read(0), 0.0);
    }
}
