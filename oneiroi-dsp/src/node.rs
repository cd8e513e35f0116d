use crate::buffer::StereoBuffer;
use crate::patch::Patch;

/// A stage that transforms a stereo block in place.
///
/// Stages read their controls from the shared [`Patch`] at the start of each
/// call; the patch does not change while a block is being processed.
pub trait StereoProcessor {
    /// Process `buffer.size()` frames of `buffer`.
    fn process(&mut self, patch: &Patch, buffer: &mut StereoBuffer<'_>);
}

/// A stage that writes a fresh stereo block without reading one.
pub trait StereoGenerator {
    /// Overwrite `output` with `output.size()` frames.
    fn generate(&mut self, patch: &Patch, output: &mut StereoBuffer<'_>);
}

/// A block-rate stage that publishes into the shared [`Patch`] instead of audio.
///
/// Control stages run before any audio stage so that everything downstream
/// sees this block's modulation and clock.
pub trait ControlStage {
    /// Advance by `frames` samples.
    fn process(&mut self, patch: &mut Patch, frames: usize);
}
