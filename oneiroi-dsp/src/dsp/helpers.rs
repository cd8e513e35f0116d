//! Small shared DSP helpers.

use core::f32::consts::TAU;

/// Exponential-feel mapping of a 0..1 control: `x²`.
#[inline]
pub fn map_expo(x: f32) -> f32 {
    x * x
}

/// Frequency ratio for an interval in semitones.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    libm::exp2f(semitones / 12.0)
}

#[inline]
pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Linear crossfade from `a` (t = 0) to `b` (t = 1).
#[inline]
pub fn crossfade(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One-pole low-pass smoother.
#[derive(Clone, Copy, Debug, Default)]
pub struct OnePole {
    coefficient: f32,
    z: f32,
}

impl OnePole {
    pub fn new(cutoff: f32, sample_rate: f32) -> Self {
        let mut f = OnePole::default();
        f.set_cutoff(cutoff, sample_rate);
        f
    }

    pub fn set_cutoff(&mut self, cutoff: f32, sample_rate: f32) {
        self.coefficient = 1.0 - libm::expf(-TAU * cutoff / sample_rate);
    }

    /// Set the smoothing coefficient directly (`1` passes the input through).
    pub fn set_coefficient(&mut self, coefficient: f32) {
        self.coefficient = clamp(coefficient, 0.0, 1.0);
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        self.z += self.coefficient * (x - self.z);
        self.z
    }

    pub fn value(&self) -> f32 {
        self.z
    }

    pub fn reset(&mut self) {
        self.z = 0.0;
    }
}

/// Tilt EQ built on a one-pole split.
///
/// `tilt` 0 keeps only the lows, 1 only the highs, 0.5 is flat.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tilt {
    split: OnePole,
    low_gain: f32,
    high_gain: f32,
}

impl Tilt {
    pub fn new(split_hz: f32, sample_rate: f32) -> Self {
        let mut t = Tilt {
            split: OnePole::new(split_hz, sample_rate),
            ..Default::default()
        };
        t.set_tilt(0.5);
        t
    }

    pub fn set_tilt(&mut self, tilt: f32) {
        let tilt = clamp(tilt, 0.0, 1.0);
        self.low_gain = clamp(2.0 * (1.0 - tilt), 0.0, 1.0);
        self.high_gain = clamp(2.0 * tilt, 0.0, 1.0);
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let low = self.split.process(x);
        low * self.low_gain + (x - low) * self.high_gain
    }
}
