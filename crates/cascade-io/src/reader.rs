//! Source window management.
//!
//! The [`SourceReader`] pulls fixed-size windows of interleaved frames from
//! an [`AudioSource`]. A uniform chain reads the window as-is; a split chain
//! reads one de-interleaved lane per channel. Consumption is tracked per lane
//! and the window only counts as exhausted once every lane has taken its
//! whole share.

use cascade_core::{AudioSource, Sample};

/// Windowed, optionally de-interleaving reader over an [`AudioSource`].
#[derive(Debug)]
pub struct SourceReader<S> {
    source: S,
    channels: usize,
    window_frames: usize,
    /// Interleaved scratch window, used only when de-interleaving.
    scratch: Vec<Sample>,
    lanes: Vec<Vec<Sample>>,
    used: Vec<usize>,
    next_start: u64,
}

impl<S: AudioSource> SourceReader<S> {
    /// Create a reader that splits the source into `lanes` lanes.
    ///
    /// `lanes` is 1 for a uniform chain and the channel count for a split
    /// chain. The reader starts exhausted, so the first request refills.
    ///
    /// # Panics
    ///
    /// Panics if `lanes` is neither 1 nor the source's channel count.
    pub fn new(source: S, lanes: usize, window_frames: usize) -> Self {
        let channels = source.channels();
        assert!(
            lanes == 1 || lanes == channels,
            "{lanes} lanes for a {channels}-channel source"
        );
        let lane_len = window_frames * channels / lanes;
        let scratch = if lanes > 1 {
            vec![0; window_frames * channels]
        } else {
            Vec::new()
        };
        Self {
            source,
            channels,
            window_frames,
            scratch,
            lanes: vec![vec![0; lane_len]; lanes],
            used: vec![lane_len; lanes],
            next_start: 0,
        }
    }

    /// Frame index of the next upstream read.
    pub fn next_start(&self) -> u64 {
        self.next_start
    }

    /// Frames pulled per refill.
    pub fn window_frames(&self) -> usize {
        self.window_frames
    }

    /// Number of lanes.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Unwrap the source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Returns true once every lane has consumed its share of the window.
    pub fn is_exhausted(&self) -> bool {
        self.lanes
            .iter()
            .zip(&self.used)
            .all(|(lane, &used)| used == lane.len())
    }

    /// Unconsumed samples of `lane`.
    pub fn input(&self, lane: usize) -> &[Sample] {
        &self.lanes[lane][self.used[lane]..]
    }

    /// Mark `n` samples of `lane` as consumed.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the unconsumed part of the lane.
    pub fn consume(&mut self, lane: usize, n: usize) {
        let remaining = self.lanes[lane].len() - self.used[lane];
        assert!(n <= remaining, "consume {n} exceeds window remainder {remaining}");
        self.used[lane] += n;
    }

    /// Pull the next window from the source.
    pub fn refill(&mut self) {
        if self.lanes.len() == 1 {
            self.source.fill(self.next_start, &mut self.lanes[0]);
        } else {
            self.source.fill(self.next_start, &mut self.scratch);
            let channels = self.channels;
            for (lane, samples) in self.lanes.iter_mut().enumerate() {
                for (dst, frame) in samples.iter_mut().zip(self.scratch.chunks_exact(channels)) {
                    *dst = frame[lane];
                }
            }
        }
        self.used.fill(0);
        self.next_start += self.window_frames as u64;
        tracing::trace!(next_start = self.next_start, "source window refilled");
    }

    /// Go back to frame 0 and drop whatever is left of the window.
    pub fn rewind(&mut self) {
        for (used, lane) in self.used.iter_mut().zip(&self.lanes) {
            *used = lane.len();
        }
        self.next_start = 0;
    }
}
