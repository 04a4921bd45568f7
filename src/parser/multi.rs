//! Multi-pattern streaming search.
//!
//! Every target is an independent automaton whose state is the length of
//! its prefix currently matched against the tail of the input. All of them
//! are fed the same bytes in lockstep; the first to reach its full length
//! wins, ties going to the lowest index.
//!
//! On a mismatch a target does not simply restart. It falls back to the
//! longest proper suffix of what it had matched that is also a prefix of
//! the target and can be extended by the current byte:
//!
//! ```text
//! target  1 1 1 1 2
//! input   1 1 1 1 1 ...
//!                 ^ mismatch at index 4; "111" + '1' still matches, index = 4
//! ```
//!
//! Resetting to zero instead would miss `11112` inside `11111112`.
//! Candidates are checked by direct comparison rather than a precomputed
//! failure table; targets are short and bytes arrive slowly.

use super::Parser;
use crate::hal::Clock;
use crate::stream::ByteSource;

/// One search pattern and its match progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiTarget<'a> {
    bytes: &'a [u8],
    index: usize,
}

impl<'a> MultiTarget<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, index: 0 }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length of the prefix matched so far.
    pub fn matched(&self) -> usize {
        self.index
    }

    /// Forget any partial match.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Feed one input byte. Returns `true` when the whole target has matched.
    ///
    /// A completed target stays matched until [`reset`](Self::reset); an
    /// empty target is always matched.
    pub fn feed(&mut self, c: u8) -> bool {
        if self.index == self.bytes.len() {
            return true;
        }

        if c == self.bytes[self.index] {
            self.index += 1;
            return self.index == self.bytes.len();
        }

        if self.index == 0 {
            return false;
        }

        self.index = self.fallback(c);
        false
    }

    /// Longest `k` in `1..=index` such that `bytes[..k-1]` ends the matched
    /// prefix and `bytes[k-1] == c`; `0` if there is none.
    fn fallback(&self, c: u8) -> usize {
        let matched = self.index;
        (1..=matched)
            .rev()
            .find(|&k| {
                let keep = k - 1;
                self.bytes[keep] == c && self.bytes[..keep] == self.bytes[matched - keep..matched]
            })
            .unwrap_or(0)
    }
}

impl<S: ByteSource, C: Clock> Parser<S, C> {
    /// Read until one of `targets` appears; returns its index.
    ///
    /// Match progress is reset on entry. A zero-length target matches at
    /// once without reading. `None` when a read times out first.
    pub fn find_multi(&mut self, targets: &mut [MultiTarget<'_>]) -> Option<usize> {
        if let Some(empty) = targets.iter().position(MultiTarget::is_empty) {
            return Some(empty);
        }
        targets.iter_mut().for_each(MultiTarget::reset);

        loop {
            let c = self.timed_read()?;
            for (i, target) in targets.iter_mut().enumerate() {
                if target.feed(c) {
                    return Some(i);
                }
            }
        }
    }
}
