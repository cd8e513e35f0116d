//! Runtime sizing of the engine.
//!
//! Everything that decides how much memory the engine takes from the arena
//! lives here. The defaults reproduce the compile-time [`constants`](crate::constants).

use crate::constants::{DEFAULT_SAMPLE_RATE, ECHO_FRAMES, LOOPER_FRAMES, MAX_BLOCK_SIZE};
use crate::error::{Error, Result};

/// Sizing and rate parameters fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Audio sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the engine will ever be asked to process.
    pub max_block_size: usize,
    /// Frames per channel of looper tape.
    pub looper_frames: usize,
    /// Frames per channel of echo memory.
    pub echo_frames: usize,
}

impl EngineConfig {
    /// Configuration for a given host rate and block size, other sizes at their defaults.
    pub fn new(sample_rate: f32, max_block_size: usize) -> Self {
        EngineConfig {
            sample_rate,
            max_block_size,
            ..Self::default()
        }
    }

    /// Block rate in blocks per second.
    pub fn block_rate(&self) -> f32 {
        self.sample_rate / self.max_block_size as f32
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate > 0.0) {
            return Err(Error::InvalidConfig("sample rate must be positive"));
        }
        if self.max_block_size == 0 {
            return Err(Error::InvalidConfig("block size must be non-zero"));
        }
        if self.looper_frames == 0 {
            return Err(Error::InvalidConfig("looper needs at least one frame"));
        }
        if self.echo_frames < 2 {
            return Err(Error::InvalidConfig("echo needs at least two frames"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_block_size: MAX_BLOCK_SIZE,
            looper_frames: LOOPER_FRAMES,
            echo_frames: ECHO_FRAMES,
        }
    }
}
