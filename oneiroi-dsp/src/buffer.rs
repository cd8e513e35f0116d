//! Multi-channel sample buffers.
//!
//! A [`SampleBuffer`] is the unit of audio passed between stages. Each
//! channel is a separately allocated arena slice sized for the largest block;
//! [`set_size`](SampleBuffer::set_size) only changes how much of it the
//! current block uses.

use crate::arena::Arena;
use crate::array::FloatArray;
use crate::constants::{LEFT_CHANNEL, RIGHT_CHANNEL};
use crate::error::Result;

/// `N` channels of planar audio.
pub struct SampleBuffer<'a, const N: usize> {
    channels: [&'a mut [f32]; N],
    size: usize,
}

/// The two-channel buffer every stage works on.
pub type StereoBuffer<'a> = SampleBuffer<'a, 2>;

impl<'a, const N: usize> SampleBuffer<'a, N> {
    /// Allocate `N` zeroed channels of `max_block` samples each.
    pub fn create(arena: &mut Arena<'a>, max_block: usize) -> Result<Self> {
        let mut channels: [&'a mut [f32]; N] = core::array::from_fn(|_| Default::default());
        for channel in channels.iter_mut() {
            *channel = arena.alloc_floats(max_block)?;
        }
        Ok(SampleBuffer {
            channels,
            size: max_block,
        })
    }

    pub const fn channels(&self) -> usize {
        N
    }

    /// Samples per channel in the current block.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Samples per channel the backing storage holds.
    pub fn capacity(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// Change the logical block length, clamped to the capacity.
    pub fn set_size(&mut self, size: usize) {
        self.size = size.min(self.capacity());
    }

    /// Mutable view of one channel's current block; empty when `ch >= N`.
    pub fn samples(&mut self, ch: usize) -> FloatArray<'_> {
        let size = self.size;
        match self.channels.get_mut(ch) {
            Some(data) => FloatArray::new(&mut data[..size]),
            None => FloatArray::empty(),
        }
    }

    /// Read-only view of one channel's current block; empty when `ch >= N`.
    pub fn samples_ref(&self, ch: usize) -> &[f32] {
        match self.channels.get(ch) {
            Some(data) => &data[..self.size],
            None => &[],
        }
    }

    pub fn clear(&mut self) {
        for ch in 0..N {
            self.samples(ch).clear();
        }
    }

    /// Copy every channel of `other`, as far as both block sizes allow.
    pub fn copy_from<const M: usize>(&mut self, other: &SampleBuffer<'_, M>) {
        for ch in 0..N.min(M) {
            self.samples(ch).copy_from(other.samples_ref(ch));
        }
    }

    /// Add `other` channel by channel.
    pub fn add<const M: usize>(&mut self, other: &SampleBuffer<'_, M>) {
        for ch in 0..N.min(M) {
            self.samples(ch).add(other.samples_ref(ch));
        }
    }

    pub fn multiply(&mut self, gain: f32) {
        for ch in 0..N {
            self.samples(ch).multiply_scalar(gain);
        }
    }

    /// Fill from planar data: channel `c` reads `source[c * size..(c + 1) * size]`.
    pub fn split(&mut self, source: &[f32]) {
        let size = self.size;
        for (ch, chunk) in source.chunks(size.max(1)).take(N).enumerate() {
            self.samples(ch).copy_from(chunk);
        }
    }

    /// Write planar data, the inverse of [`split`](Self::split).
    pub fn combine(&self, dest: &mut [f32]) {
        let size = self.size;
        for (ch, chunk) in dest.chunks_mut(size.max(1)).take(N).enumerate() {
            let n = chunk.len().min(size);
            chunk[..n].copy_from_slice(&self.samples_ref(ch)[..n]);
        }
    }
}

impl<'a> SampleBuffer<'a, 2> {
    /// Both channels of the current block at once.
    pub fn stereo_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        let size = self.size;
        let [left, right] = &mut self.channels;
        (&mut left[..size], &mut right[..size])
    }

    pub fn left(&self) -> &[f32] {
        self.samples_ref(LEFT_CHANNEL)
    }

    pub fn right(&self) -> &[f32] {
        self.samples_ref(RIGHT_CHANNEL)
    }
}
