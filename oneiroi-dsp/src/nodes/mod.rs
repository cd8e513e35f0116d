//! Signal-path stages.
//!
//! Audio stages implement [`StereoProcessor`](crate::node::StereoProcessor)
//! or [`StereoGenerator`](crate::node::StereoGenerator); the LFO and the
//! clock tracker implement [`ControlStage`](crate::node::ControlStage). The
//! looper and the wavetable oscillator take extra buffers and expose their
//! own `process`/`generate`.

mod ambience;
mod clock;
mod dc_blocker;
mod echo;
mod filter;
mod limiter;
mod looper;
mod modulation;
mod resonator;
mod sine_oscillator;
mod super_saw;
mod wavetable_oscillator;

pub use ambience::Ambience;
pub use clock::{Clock, INTERNAL_BPM};
pub use dc_blocker::StereoDcBlockingFilter;
pub use echo::{Echo, SYNC_DIVISIONS};
pub use filter::{Filter, FilterMode, MAX_CUTOFF_HZ, MIN_CUTOFF_HZ};
pub use limiter::Limiter;
pub use looper::Looper;
pub use modulation::{Modulation, Shape};
pub use resonator::Resonator;
pub use sine_oscillator::StereoSineOscillator;
pub use super_saw::StereoSuperSaw;
pub use wavetable_oscillator::{StereoWaveTableOscillator, FRAME_SIZE as WAVETABLE_FRAME_SIZE};

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::EngineConfig;
    use crate::constants::FAST_POOL_BYTES;
    use std::vec::Vec;

    /// Fast and bulk regions for a test arena.
    pub fn regions(bulk: usize) -> (Vec<u8>, Vec<u8>) {
        (vec![0u8; FAST_POOL_BYTES], vec![0u8; bulk])
    }

    /// 48 kHz, 32-frame blocks and a tenth of a second of looper and echo memory.
    pub fn small_config() -> EngineConfig {
        EngineConfig {
            sample_rate: 48_000.0,
            max_block_size: 32,
            looper_frames: 4_800,
            echo_frames: 4_800,
        }
    }
}
