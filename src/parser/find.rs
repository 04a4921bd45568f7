//! Single-token search.
//!
//! Tracks one running match index per token; on a mismatch the index
//! drops to zero and the byte is re-tested against the first token byte.
//! With a single token there is nothing to backtrack into beyond that.

use super::Parser;
use crate::hal::Clock;
use crate::stream::ByteSource;

impl<S: ByteSource, C: Clock> Parser<S, C> {
    /// Consume input up to and including the first occurrence of `target`.
    ///
    /// `false` on timeout. An empty target matches without reading.
    pub fn find(&mut self, target: &[u8]) -> bool {
        self.find_until(target, &[])
    }

    /// As [`find`](Self::find), but give up once `terminator` has been read.
    ///
    /// If the same byte completes both, the target wins.
    pub fn find_until(&mut self, target: &[u8], terminator: &[u8]) -> bool {
        if target.is_empty() {
            return true;
        }

        let mut index = 0;
        let mut term_index = 0;

        while let Some(c) = self.timed_read() {
            if advance(target, &mut index, c) {
                return true;
            }
            if !terminator.is_empty() && advance(terminator, &mut term_index, c) {
                return false;
            }
        }
        false
    }
}

/// Feed one byte to a running match. Returns `true` when `token` completes.
#[inline]
fn advance(token: &[u8], index: &mut usize, c: u8) -> bool {
    if c != token[*index] {
        *index = 0;
    }
    if c == token[*index] {
        *index += 1;
        if *index == token.len() {
            return true;
        }
    }
    false
}
