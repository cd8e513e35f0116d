//! # oneiroi-dsp
//!
//! A `no_std`, allocation-free stereo synthesizer and effects engine for
//! embedded plug-in hosts. Two oscillators and a looper feed a chain of
//! resonator, echo and ambience, with a multimode filter that can sit at
//! any of four points in the chain. All memory is carved out of two regions
//! the host hands over once at construction.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Memory | [`arena`] | Two-pool bump allocator (fast / bulk) |
//! | Buffers | [`array`] / [`buffer`] | Float array views and planar stereo blocks |
//! | Control | [`patch`] | Shared controls, CV inputs and engine state |
//! | Trait | [`node`] | `StereoProcessor`, `StereoGenerator`, `ControlStage` |
//! | DSP | [`dsp`] / [`nodes`] | Filters, delay lines, oscillators and every stage |
//! | Engine | [`engine`] | Per-block orchestration of the whole chain |
//! | Host | [`host`] | Parameter table, bus routing and diagnostics |
//!
//! ## Quick start
//!
//! ```ignore
//! use oneiroi_dsp::host::{calculate_requirements, Algorithm, HostGlobals, MemoryRegions};
//!
//! let req = calculate_requirements();
//! // `fast` and `bulk` are `req.fast_pool_bytes` and `req.bulk_pool_bytes` long.
//! let mut algorithm = Algorithm::construct(
//!     MemoryRegions { fast, bulk },
//!     HostGlobals { sample_rate: 48_000.0, max_frames_per_step: 128 },
//! )?;
//!
//! // From the host's audio callback:
//! algorithm.step(bus, frames_by_4);
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `accel` | no | Four-at-a-time unrolled array kernels |
//!
//! ## Audio parameters
//!
//! - **Block size:** up to 128 frames ([`constants::MAX_BLOCK_SIZE`])
//! - **Sample rate:** host supplied, 48 kHz by default
//! - **Sample format:** `f32`, planar stereo
//! - **Memory:** [`constants::FAST_POOL_BYTES`] fast, [`constants::BULK_POOL_BYTES`] bulk

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod arena;
pub mod array;
pub mod buffer;
pub mod config;
pub mod constants;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod host;
pub mod node;
pub mod nodes;
pub mod patch;

pub use arena::Arena;
pub use buffer::StereoBuffer;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use patch::Patch;
