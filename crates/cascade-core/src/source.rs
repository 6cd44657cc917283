//! Upstream audio providers.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::Sample;

/// Pull-based provider of interleaved audio frames.
///
/// The pipeline asks for whole frames starting at a frame index; the
/// provider fills the buffer completely. What a provider returns for frames
/// outside its range is its own concern (silence is customary).
pub trait AudioSource {
    /// Number of interleaved channels per frame.
    fn channels(&self) -> usize;

    /// Sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Fill `buf` with `buf.len() / channels()` frames starting at `start_frame`.
    fn fill(&mut self, start_frame: u64, buf: &mut [Sample]);
}

impl<S: AudioSource + ?Sized> AudioSource for &mut S {
    fn channels(&self) -> usize {
        (**self).channels()
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn fill(&mut self, start_frame: u64, buf: &mut [Sample]) {
        (**self).fill(start_frame, buf);
    }
}

/// [`AudioSource`] over an in-memory interleaved buffer.
///
/// Frames past the end read as silence.
///
/// # Example
///
/// ```rust
/// use cascade_core::{AudioSource, MemorySource};
///
/// let mut source = MemorySource::new(vec![1, -1, 2, -2], 2, 8000);
/// let mut buf = [0; 6];
/// source.fill(1, &mut buf);
/// assert_eq!(buf, [2, -2, 0, 0, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    samples: Vec<Sample>,
    channels: usize,
    sample_rate: u32,
}

impl MemorySource {
    /// Wrap interleaved `samples` of `channels` channels.
    ///
    /// # Panics
    ///
    /// Panics if `channels` is zero.
    pub fn new(samples: Vec<Sample>, channels: usize, sample_rate: u32) -> Self {
        assert!(channels > 0, "a source needs at least one channel");
        debug_assert_eq!(
            samples.len() % channels,
            0,
            "sample count must be a whole number of frames"
        );
        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    /// Number of whole frames held.
    pub fn frames(&self) -> u64 {
        (self.samples.len() / self.channels) as u64
    }

    /// The interleaved samples.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl AudioSource for MemorySource {
    fn channels(&self) -> usize {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn fill(&mut self, start_frame: u64, buf: &mut [Sample]) {
        let start = usize::try_from(start_frame)
            .ok()
            .and_then(|frame| frame.checked_mul(self.channels))
            .unwrap_or(usize::MAX)
            .min(self.samples.len());
        let available = (self.samples.len() - start).min(buf.len());
        buf[..available].copy_from_slice(&self.samples[start..start + available]);
        buf[available..].fill(0);
    }
}
