// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! A growable byte buffer that supports append-at-end and append-at-front,
//! deferring the actual flattening until [`Scratchpad::materialize`].
//!
//! The front-append capability exists so the encoder can emit the ETF
//! version byte (`131`) as the very last thing it writes to the pad, after
//! the rest of the term is known to have encoded successfully, without
//! paying for a second buffer or a memmove. In practice the version byte
//! is the only segment ever pushed to the front.

/// A half-open `[start, end)` range into [`Scratchpad`]'s backing array.
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: usize,
    end: usize,
}

/// The encoder's scratch buffer.
///
/// Bytes are written into a backing `Vec<u8>` that grows on demand; a list
/// of [`Segment`]s records, in logical (materialization) order, which
/// ranges of the backing array make up the final output. Segments are
/// appended to the back by [`Scratchpad::end_append`] and to the front by
/// [`Scratchpad::start_append`]; either way the bytes themselves always
/// land at the current `used` watermark.
#[derive(Debug)]
pub struct Scratchpad {
    alloc: Vec<u8>,
    used: usize,
    segments: Vec<Segment>,
    init_alloc: usize,
}

impl Scratchpad {
    /// Allocates a backing array of `initial_capacity` bytes and an empty
    /// segment list.
    #[must_use]
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            alloc: vec![0u8; initial_capacity],
            used: 0,
            segments: Vec::new(),
            init_alloc: initial_capacity,
        }
    }

    fn grow_for(&mut self, additional: usize) {
        let required = self.used + additional;
        if required > self.alloc.len() {
            self.alloc
                .resize(self.alloc.len() + additional + self.init_alloc, 0);
        }
    }

    /// Writes `bytes` at the current watermark, growing the backing array
    /// first if necessary, and returns the `[start, end)` range written.
    fn write_raw(&mut self, bytes: &[u8]) -> (usize, usize) {
        self.grow_for(bytes.len());
        let start = self.used;
        let end = start + bytes.len();
        self.alloc[start..end].copy_from_slice(bytes);
        self.used = end;
        (start, end)
    }

    /// Appends `bytes` to the end of the pad's logical output.
    pub fn end_append(&mut self, bytes: &[u8]) {
        let (start, end) = self.write_raw(bytes);
        self.segments.push(Segment { start, end });
    }

    /// Appends `bytes` to the front of the pad's logical output. The bytes
    /// still land physically at the current watermark; only their position
    /// in the segment list (and thus in the materialized output) changes.
    pub fn start_append(&mut self, bytes: &[u8]) {
        let (start, end) = self.write_raw(bytes);
        self.segments.insert(0, Segment { start, end });
    }

    /// Flattens the pad into a single contiguous byte sequence, visiting
    /// segments in their logical order.
    #[must_use]
    pub fn materialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.used);
        for seg in &self.segments {
            out.extend_from_slice(&self.alloc[seg.start..seg.end]);
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn end_append_preserves_order() {
        let mut pad = Scratchpad::new(4);
        pad.end_append(&[1, 2]);
        pad.end_append(&[3, 4, 5]);
        assert_eq!(pad.materialize(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn start_append_prepends_logically() {
        let mut pad = Scratchpad::new(4);
        pad.end_append(&[2, 3]);
        pad.start_append(&[1]);
        assert_eq!(pad.materialize(), vec![1, 2, 3]);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut pad = Scratchpad::new(1);
        let chunk = vec![7u8; 64];
        pad.end_append(&chunk);
        assert_eq!(pad.materialize(), chunk);
    }

    #[test]
    fn multiple_start_appends_stay_in_prepend_order() {
        let mut pad = Scratchpad::new(4);
        pad.end_append(&[9]);
        pad.start_append(&[2]);
        pad.start_append(&[1]);
        assert_eq!(pad.materialize(), vec![1, 2, 9]);
    }
}
