/// Largest block (frames per channel) the host may ever hand to `step()`.
pub const MAX_BLOCK_SIZE: usize = 128;

/// Sample rate assumed when the host does not report one.
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

/// Number of audio channels flowing through the engine.
pub const NUM_CHANNELS: usize = 2;

/// Channel index of the left signal in a stereo buffer.
pub const LEFT_CHANNEL: usize = 0;

/// Channel index of the right signal in a stereo buffer.
pub const RIGHT_CHANNEL: usize = 1;

/// Size of the fast (tightly-coupled, on-die) pool in bytes.
pub const FAST_POOL_BYTES: usize = 10_000;

/// Size of the bulk (external DRAM) pool in bytes.
pub const BULK_POOL_BYTES: usize = 8_000_000;

/// Requests of this many bytes or more always go to the bulk pool.
pub const SMALL_OBJECT_THRESHOLD: usize = 1200;

/// Entries in the shared sine lookup table.
pub const SINE_TABLE_SIZE: usize = 2048;

/// Frames per channel of looper tape (eight seconds at 48 kHz).
pub const LOOPER_FRAMES: usize = 8 * 48_000;

/// Frames per channel of echo memory.
pub const ECHO_FRAMES: usize = 1 << 16;

/// Reference pitch of the oscillators with every tuning control centred (C4).
pub const BASE_PITCH_HZ: f32 = 261.63;

/// One octave above [`BASE_PITCH_HZ`].
pub const C5_HZ: f32 = 523.25;

/// Gain applied after looper and oscillators have been summed.
pub const SOURCES_MAKEUP_GAIN: f32 = 0.5;

/// Gain applied after the output DC blocker, ahead of the soft limiter.
pub const OUTPUT_MAKEUP_GAIN: f32 = 1.4;

/// Output level applied once startup completes, before the host sets one.
pub const DEFAULT_OUT_LEVEL: f32 = 5.0;

/// Clock input threshold for rising-edge detection.
pub const CLOCK_THRESHOLD: f32 = 0.5;
