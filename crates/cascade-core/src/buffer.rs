//! Fixed-capacity stage output buffer.
//!
//! A [`StageBuffer`] holds samples one pipeline stage has produced but the
//! next consumer has not yet read. It is a flat arena with two cursors:
//!
//! ```text
//!  0            read            write            capacity
//!  |  consumed   |   readable    |     free       |
//! ```
//!
//! Invariant: `0 <= read <= write <= capacity`. Only `[read, write)` is ever
//! handed out for reading and only `[write, capacity)` for writing. When the
//! readable region becomes empty both cursors snap back to 0, which frees the
//! whole buffer without copying.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::Sample;

/// Two-cursor owning buffer of produced-but-unread samples.
#[derive(Debug, Clone)]
pub struct StageBuffer {
    data: Vec<Sample>,
    read: usize,
    write: usize,
}

impl StageBuffer {
    /// Create an empty buffer holding up to `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            read: 0,
            write: 0,
        }
    }

    /// Maximum number of samples the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of readable samples.
    pub fn len(&self) -> usize {
        self.write - self.read
    }

    /// Returns `true` if there is nothing to read.
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// Room left after the write cursor.
    pub fn free(&self) -> usize {
        self.data.len() - self.write
    }

    /// Read cursor position.
    pub fn read_pos(&self) -> usize {
        self.read
    }

    /// Write cursor position.
    pub fn write_pos(&self) -> usize {
        self.write
    }

    /// The readable region `[read, write)`.
    pub fn readable(&self) -> &[Sample] {
        &self.data[self.read..self.write]
    }

    /// The writable region `[write, capacity)`.
    pub fn writable(&mut self) -> &mut [Sample] {
        &mut self.data[self.write..]
    }

    /// Mark `n` samples after the write cursor as written.
    ///
    /// # Panics
    ///
    /// Panics if `n > free()`.
    pub fn commit(&mut self, n: usize) {
        assert!(n <= self.free(), "commit {n} exceeds free space {}", self.free());
        self.write += n;
    }

    /// Mark `n` readable samples as consumed.
    ///
    /// Resets both cursors when the buffer drains.
    ///
    /// # Panics
    ///
    /// Panics if `n > len()`.
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.len(), "consume {n} exceeds readable {}", self.len());
        self.read += n;
        self.reset_if_drained();
    }

    /// Snap both cursors to 0 if nothing is readable.
    pub fn reset_if_drained(&mut self) {
        if self.read == self.write {
            self.read = 0;
            self.write = 0;
        }
    }

    /// Make room for the writer.
    ///
    /// A drained buffer is reset for free. A full buffer whose head has been
    /// partly consumed moves its readable samples to the front, so a
    /// consumer that waits for more input than the tail holds can still be
    /// fed.
    pub fn reclaim(&mut self) {
        self.reset_if_drained();
        if self.free() == 0 && self.read > 0 {
            let len = self.len();
            self.data.copy_within(self.read..self.write, 0);
            self.read = 0;
            self.write = len;
        }
    }

    /// Discard all content.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
    }
}
