//! Timeout-bounded parsing over a byte source.
//!
//! [`Parser`] wraps any [`ByteSource`] plus a [`Clock`] and turns the
//! non-blocking `read`/`peek` into bounded waits:
//!
//! ```text
//! ByteSource ──▶ timed_read / timed_peek ──▶ find, parse_int, find_multi, ...
//!  (may be empty)   (poll until byte or deadline)
//! ```
//!
//! "Blocking" here is a busy-wait: each wait re-arms its own deadline
//! (`now + timeout`) and polls the source until a byte shows up or the
//! deadline passes. Deadlines are compared with `wrapping_sub`, so a
//! wrapping millisecond counter is fine.
//!
//! Timeouts are not errors. They surface as `None`, `false`, a short
//! count or `0`, and the caller checks for them.

mod find;
mod multi;
mod numeric;

pub use multi::MultiTarget;

use crate::config::ParserConfig;
use crate::hal::Clock;
use crate::logging::{LogLevel, LogStream};
use crate::stream::ByteSource;

/// Stateful parsing façade over a byte source.
pub struct Parser<S, C> {
    source: S,
    clock: C,
    timeout_ms: u32,
    log: Option<&'static LogStream>,
}

impl<S: ByteSource, C: Clock> Parser<S, C> {
    /// Parser with the default one second timeout.
    pub fn new(source: S, clock: C) -> Self {
        Self::with_config(source, clock, ParserConfig::default())
    }

    pub fn with_config(source: S, clock: C, config: ParserConfig) -> Self {
        Self {
            source,
            clock,
            timeout_ms: config.timeout_ms,
            log: None,
        }
    }

    /// Report timeouts to `log` at trace level.
    pub fn with_log(mut self, log: &'static LogStream) -> Self {
        self.log = Some(log);
        self
    }

    /// Maximum milliseconds each timed wait may take.
    pub fn set_timeout(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
    }

    pub fn timeout(&self) -> u32 {
        self.timeout_ms
    }

    /// Bytes readable without waiting.
    pub fn available(&self) -> usize {
        self.source.available()
    }

    /// Next byte, waiting up to the timeout. `None` on timeout.
    pub fn timed_read(&mut self) -> Option<u8> {
        self.poll_until("read", S::read)
    }

    /// Next byte without consuming it, waiting up to the timeout.
    pub fn timed_peek(&mut self) -> Option<u8> {
        self.poll_until("peek", S::peek)
    }

    /// Fill `buf` with received bytes.
    ///
    /// Stops when `buf` is full or a read times out. Returns the number of
    /// bytes stored.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.timed_read() {
                Some(byte) => *slot = byte,
                None => break,
            }
            count += 1;
        }
        count
    }

    /// As [`read_bytes`](Self::read_bytes), also stopping at `terminator`.
    ///
    /// The terminator is consumed but not stored. An empty `buf` reads
    /// nothing.
    pub fn read_bytes_until(&mut self, terminator: u8, buf: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.timed_read() {
                Some(byte) if byte != terminator => *slot = byte,
                _ => break,
            }
            count += 1;
        }
        count
    }

    /// Collect bytes as chars until a read times out or the string is full.
    ///
    /// Each byte becomes one `char` (Latin-1 style); bytes above 0x7F take
    /// two bytes of capacity. Bytes left over when the string fills stay in
    /// the source.
    pub fn read_string<const CAP: usize>(&mut self) -> heapless::String<CAP> {
        self.collect_string(None)
    }

    /// As [`read_string`](Self::read_string), also stopping at `terminator`
    /// (consumed, not stored).
    pub fn read_string_until<const CAP: usize>(&mut self, terminator: u8) -> heapless::String<CAP> {
        self.collect_string(Some(terminator))
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn collect_string<const CAP: usize>(&mut self, terminator: Option<u8>) -> heapless::String<CAP> {
        let mut out = heapless::String::new();
        loop {
            let ch = match self.timed_peek() {
                Some(byte) if Some(byte) == terminator => {
                    self.source.read();
                    break;
                }
                Some(byte) => byte as char,
                None => break,
            };
            if out.push(ch).is_err() {
                break;
            }
            self.source.read();
        }
        out
    }

    fn poll_until(&mut self, op: &str, mut poll: impl FnMut(&mut S) -> Option<u8>) -> Option<u8> {
        let start = self.clock.now_millis();
        loop {
            if let Some(byte) = poll(&mut self.source) {
                return Some(byte);
            }
            if self.clock.now_millis().wrapping_sub(start) >= self.timeout_ms {
                break;
            }
            core::hint::spin_loop();
        }

        if let Some(log) = self.log {
            crate::rt_log!(
                LogLevel::Trace,
                log,
                self.clock.now_millis(),
                "timed {}: no data after {} ms",
                op,
                self.timeout_ms
            );
        }
        None
    }
}
