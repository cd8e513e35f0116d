//! Float array view.
//!
//! [`FloatArray`] borrows a run of samples it does not own. It never
//! allocates after [`FloatArray::create`], and its length is fixed for its
//! whole life. Operations that read one buffer and write another come in two
//! flavours: an in-place form that reads and writes `self`, and an `_into`
//! form that leaves `self` untouched and writes a destination.

pub mod backend;

use core::ops::{Deref, DerefMut};

use backend::{Active, ArrayBackend};

use crate::arena::Arena;
use crate::dsp::rng::XorShift32;
use crate::error::Result;

/// Mutable view over a contiguous run of `f32` samples.
#[derive(Debug, PartialEq)]
pub struct FloatArray<'a> {
    data: &'a mut [f32],
}

impl<'a> FloatArray<'a> {
    /// Wrap existing storage.
    pub fn new(data: &'a mut [f32]) -> Self {
        FloatArray { data }
    }

    /// A zero-length view.
    pub fn empty() -> Self {
        FloatArray { data: &mut [] }
    }

    /// Take `len` zeroed samples from the arena.
    pub fn create(arena: &mut Arena<'a>, len: usize) -> Result<Self> {
        Ok(FloatArray::new(arena.alloc_floats(len)?))
    }

    /// Give the underlying storage back.
    pub fn into_inner(self) -> &'a mut [f32] {
        self.data
    }

    /// Shorter-lived view over the same samples.
    pub fn reborrow(&mut self) -> FloatArray<'_> {
        FloatArray {
            data: &mut *self.data,
        }
    }

    /// View over `len` samples starting at `offset`. Both views alias.
    ///
    /// Panics when the range runs past the end.
    pub fn sub_array(&mut self, offset: usize, len: usize) -> FloatArray<'_> {
        FloatArray {
            data: &mut self.data[offset..offset + len],
        }
    }

    pub fn set_all(&mut self, value: f32) {
        Active::fill(self.data, value);
    }

    pub fn clear(&mut self) {
        self.set_all(0.0);
    }

    // --- statistics ---

    /// Smallest value and the index of its first occurrence.
    pub fn min(&self) -> (f32, usize) {
        Active::min(&*self.data)
    }

    /// Largest value and the index of its first occurrence.
    pub fn max(&self) -> (f32, usize) {
        Active::max(&*self.data)
    }

    pub fn min_value(&self) -> f32 {
        self.min().0
    }

    pub fn min_index(&self) -> usize {
        self.min().1
    }

    pub fn max_value(&self) -> f32 {
        self.max().0
    }

    pub fn max_index(&self) -> usize {
        self.max().1
    }

    pub fn sum(&self) -> f32 {
        Active::sum(&*self.data)
    }

    /// Sum of squares.
    pub fn power(&self) -> f32 {
        Active::power(&*self.data)
    }

    /// Arithmetic mean; zero for an empty array.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.sum() / self.data.len() as f32
    }

    /// Root mean square; zero for an empty array.
    pub fn rms(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        libm::sqrtf(self.power() / self.data.len() as f32)
    }

    /// Sample variance (divides by `n - 1`); zero below two samples.
    pub fn variance(&self) -> f32 {
        let n = self.data.len();
        if n < 2 {
            return 0.0;
        }
        let sum = self.sum();
        (self.power() - sum * sum / n as f32) / (n - 1) as f32
    }

    pub fn standard_deviation(&self) -> f32 {
        libm::sqrtf(self.variance())
    }

    // --- unary shaping ---

    /// Absolute value of every sample.
    pub fn rectify(&mut self) {
        Active::abs(self.data);
    }

    pub fn rectify_into(&self, dest: &mut [f32]) {
        Active::abs_into(&*self.data, dest);
    }

    pub fn reverse(&mut self) {
        self.data.reverse();
    }

    pub fn reverse_into(&self, dest: &mut [f32]) {
        for (d, s) in dest.iter_mut().zip(self.data.iter().rev()) {
            *d = *s;
        }
    }

    pub fn reciprocal(&mut self) {
        for x in self.data.iter_mut() {
            *x = 1.0 / *x;
        }
    }

    pub fn reciprocal_into(&self, dest: &mut [f32]) {
        for (d, s) in dest.iter_mut().zip(self.data.iter()) {
            *d = 1.0 / s;
        }
    }

    pub fn negate(&mut self) {
        Active::negate(self.data);
    }

    pub fn negate_into(&self, dest: &mut [f32]) {
        Active::negate_into(&*self.data, dest);
    }

    /// Uniform noise in `[-1, 1)`.
    pub fn noise(&mut self, rng: &mut XorShift32) {
        self.noise_range(rng, -1.0, 1.0);
    }

    /// Uniform noise starting at `min` and spanning `|max - min|`.
    pub fn noise_range(&mut self, rng: &mut XorShift32, min: f32, max: f32) {
        let amplitude = libm::fabsf(max - min);
        for x in self.data.iter_mut() {
            *x = rng.next_f32() * amplitude + min;
        }
    }

    /// Clamp to `[-1, 1]`.
    pub fn clip(&mut self) {
        self.clip_range(1.0);
    }

    /// Clamp to `[-range, range]`.
    pub fn clip_range(&mut self, range: f32) {
        self.clip_between(-range, range);
    }

    pub fn clip_between(&mut self, min: f32, max: f32) {
        for x in self.data.iter_mut() {
            if *x > max {
                *x = max;
            } else if *x < min {
                *x = min;
            }
        }
    }

    /// Cubic soft clip with unity slope at the origin.
    ///
    /// Output reaches ±1 with zero slope at ±1.5 and holds there.
    pub fn softclip(&mut self) {
        for x in self.data.iter_mut() {
            *x = softclip_sample(*x);
        }
    }

    pub fn softclip_into(&self, dest: &mut [f32]) {
        for (d, s) in dest.iter_mut().zip(self.data.iter()) {
            *d = softclip_sample(*s);
        }
    }

    pub fn tanh(&mut self) {
        for x in self.data.iter_mut() {
            *x = libm::tanhf(*x);
        }
    }

    pub fn tanh_into(&self, dest: &mut [f32]) {
        for (d, s) in dest.iter_mut().zip(self.data.iter()) {
            *d = libm::tanhf(*s);
        }
    }

    // --- arithmetic ---

    pub fn add(&mut self, operand: &[f32]) {
        Active::add(self.data, operand);
    }

    pub fn add_into(&self, operand: &[f32], dest: &mut [f32]) {
        Active::add_into(&*self.data, operand, dest);
    }

    pub fn add_scalar(&mut self, value: f32) {
        Active::offset(self.data, value);
    }

    pub fn add_scalar_into(&self, value: f32, dest: &mut [f32]) {
        Active::offset_into(&*self.data, value, dest);
    }

    pub fn subtract(&mut self, operand: &[f32]) {
        Active::sub(self.data, operand);
    }

    pub fn subtract_into(&self, operand: &[f32], dest: &mut [f32]) {
        Active::sub_into(&*self.data, operand, dest);
    }

    pub fn subtract_scalar(&mut self, value: f32) {
        Active::offset(self.data, -value);
    }

    pub fn multiply(&mut self, operand: &[f32]) {
        Active::mul(self.data, operand);
    }

    pub fn multiply_into(&self, operand: &[f32], dest: &mut [f32]) {
        Active::mul_into(&*self.data, operand, dest);
    }

    pub fn multiply_scalar(&mut self, gain: f32) {
        Active::scale(self.data, gain);
    }

    pub fn multiply_scalar_into(&self, gain: f32, dest: &mut [f32]) {
        Active::scale_into(&*self.data, gain, dest);
    }

    // --- signal operations ---

    /// Full convolution with `operand`.
    ///
    /// `dest` needs `len() + operand.len() - 1` samples.
    pub fn convolve(&self, operand: &[f32], dest: &mut [f32]) {
        Active::convolve(&*self.data, operand, dest);
    }

    /// Convolution outputs `offset..offset + samples` only.
    ///
    /// Results land at `dest[offset..offset + samples]`, the same indices a
    /// full convolution would use; `dest[..offset]` is left untouched. `dest`
    /// must therefore be sized for the full convolution.
    pub fn convolve_partial(&self, operand: &[f32], dest: &mut [f32], offset: usize, samples: usize) {
        Active::convolve_partial(&*self.data, operand, dest, offset, samples);
    }

    /// Cross-correlation with `operand`, zeroing all of `dest` first.
    pub fn correlate(&self, operand: &[f32], dest: &mut [f32]) {
        Active::fill(dest, 0.0);
        self.correlate_initialized(operand, dest);
    }

    /// Cross-correlation into a destination the caller has already prepared.
    ///
    /// Writes the first `len() + operand.len() - 1` samples of `dest`; anything
    /// past that keeps its previous contents. `operand` is read back to front
    /// and never modified.
    pub fn correlate_initialized(&self, operand: &[f32], dest: &mut [f32]) {
        if self.data.is_empty() || operand.is_empty() {
            return;
        }
        let last = operand.len() - 1;
        let outputs = (self.data.len() + last).min(dest.len());
        for (n, out) in dest.iter_mut().enumerate().take(outputs) {
            let mut acc = 0.0;
            for k in 0..=last.min(n) {
                if let Some(&x) = self.data.get(n - k) {
                    acc += x * operand[last - k];
                }
            }
            *out = acc;
        }
    }

    pub fn gain_to_decibel(&self, dest: &mut [f32]) {
        for (d, s) in dest.iter_mut().zip(self.data.iter()) {
            *d = libm::log10f(*s) * 20.0;
        }
    }

    pub fn decibel_to_gain(&self, dest: &mut [f32]) {
        for (d, s) in dest.iter_mut().zip(self.data.iter()) {
            *d = libm::powf(10.0, *s * 0.05);
        }
    }

    /// Linear ramp starting at `from`, approaching `to` one step short.
    pub fn ramp(&mut self, from: f32, to: f32) {
        let step = (to - from) / self.data.len() as f32;
        let mut value = from;
        for x in self.data.iter_mut() {
            *x = value;
            value += step;
        }
    }

    /// Multiply by a linear gain ramp from `from` towards `to`.
    pub fn scale(&mut self, from: f32, to: f32) {
        let step = (to - from) / self.data.len() as f32;
        let mut gain = from;
        for x in self.data.iter_mut() {
            *x *= gain;
            gain += step;
        }
    }

    /// [`scale`](Self::scale) into a destination, leaving `self` as is.
    pub fn scale_into(&self, from: f32, to: f32, dest: &mut [f32]) {
        let step = (to - from) / self.data.len() as f32;
        let mut gain = from;
        for (d, s) in dest.iter_mut().zip(self.data.iter()) {
            *d = s * gain;
            gain += step;
        }
    }

    // --- copying ---

    /// Copy as many samples as both sides hold.
    pub fn copy_from(&mut self, source: &[f32]) {
        let n = self.data.len().min(source.len());
        self.data[..n].copy_from_slice(&source[..n]);
    }

    pub fn copy_to(&self, dest: &mut [f32]) {
        let n = self.data.len().min(dest.len());
        dest[..n].copy_from_slice(&self.data[..n]);
    }

    /// Copy `len` samples from `source[source_offset..]` to `self[dest_offset..]`.
    pub fn insert(&mut self, source: &[f32], source_offset: usize, dest_offset: usize, len: usize) {
        self.data[dest_offset..dest_offset + len]
            .copy_from_slice(&source[source_offset..source_offset + len]);
    }

    /// Move `len` samples within the array; ranges may overlap.
    pub fn move_within(&mut self, from: usize, to: usize, len: usize) {
        self.data.copy_within(from..from + len, to);
    }

    /// Same length and same samples.
    pub fn equals(&self, other: &[f32]) -> bool {
        self.data == other
    }
}

impl Deref for FloatArray<'_> {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        self.data
    }
}

impl DerefMut for FloatArray<'_> {
    fn deref_mut(&mut self) -> &mut [f32] {
        self.data
    }
}

impl<'a> From<&'a mut [f32]> for FloatArray<'a> {
    fn from(data: &'a mut [f32]) -> Self {
        FloatArray::new(data)
    }
}

#[inline(always)]
pub(crate) fn softclip_sample(x: f32) -> f32 {
    let x = x.clamp(-1.5, 1.5);
    (x - (4.0 / 27.0) * x * x * x).clamp(-1.0, 1.0)
}
