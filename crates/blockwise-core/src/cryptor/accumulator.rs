//! Pending input between `update` calls.
//!
//! A sliding window over one growable buffer: consuming from the front only
//! moves a start index, and the live bytes are moved down once the consumed
//! prefix outgrows them, so draining is amortized O(1) per byte.

use zeroize::Zeroize;

/// Consumed prefix below this size is never compacted.
const COMPACT_THRESHOLD: usize = 4096;

#[derive(Default)]
pub(crate) struct Accumulator {
    buf: Vec<u8>,
    start: usize,
}

impl Accumulator {
    pub(crate) fn new() -> Self {
        Accumulator::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len() - self.start
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    /// Drop the first `n` pending bytes.
    pub(crate) fn consume(&mut self, n: usize) {
        let n = n.min(self.len());
        self.start += n;
        if self.start == self.buf.len() {
            self.clear();
        } else if self.start >= COMPACT_THRESHOLD && self.start >= self.len() {
            self.compact();
        }
    }

    /// Remove and return every pending byte.
    pub(crate) fn take_all(&mut self) -> Vec<u8> {
        let out = self.as_slice().to_vec();
        self.clear();
        out
    }

    pub(crate) fn clear(&mut self) {
        self.buf.zeroize();
        self.start = 0;
    }

    fn compact(&mut self) {
        let live = self.len();
        self.buf.copy_within(self.start.., 0);
        self.buf[live..].zeroize();
        self.buf.truncate(live);
        self.start = 0;
    }
}

impl Drop for Accumulator {
    fn drop(&mut self) {
        self.buf.zeroize();
    }
}
