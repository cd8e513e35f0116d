//! DSP building blocks shared by every stage.

pub mod biquad;
pub mod delay;
pub mod helpers;
pub mod oscillator;
pub mod rng;

pub use biquad::{BiquadFilter, MultiBiquadFilter, StereoBiquadFilter};
pub use delay::DelayLine;
pub use oscillator::{fast_sin, SineOscillator};
pub use rng::XorShift32;
