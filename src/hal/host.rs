//! Host-side stand-ins for the UART and timer.
//!
//! On host: drive the core without hardware (tests, simulations).
//! On target: `LoopbackTransmitter` still works for self-test wiring.

use core::cell::Cell;

use super::{Clock, Transmitter};
use crate::channel::RxChannel;

/// Transmitter whose TX line is wired back to a receive channel.
///
/// Every transmitted byte goes through `on_byte_received`, exactly like a
/// real loopback jumper feeding the RX interrupt.
pub struct LoopbackTransmitter<'a, const N: usize> {
    rx: &'a RxChannel<N>,
    sent: usize,
}

impl<'a, const N: usize> LoopbackTransmitter<'a, N> {
    pub fn new(rx: &'a RxChannel<N>) -> Self {
        Self { rx, sent: 0 }
    }

    /// Bytes transmitted so far (including any the receiver dropped).
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl<const N: usize> Transmitter for LoopbackTransmitter<'_, N> {
    fn transmit_ready(&mut self) -> bool {
        true
    }

    fn transmit_byte(&mut self, byte: u8) -> bool {
        self.rx.on_byte_received(byte);
        self.sent += 1;
        true
    }
}

/// Deterministic clock: every query advances time by a fixed step.
///
/// A timed read polling an empty source therefore expires after
/// `timeout / step` polls, independent of host speed.
#[derive(Debug)]
pub struct TickClock {
    now: Cell<u32>,
    step: u32,
}

impl TickClock {
    pub const fn new(start: u32, step: u32) -> Self {
        Self {
            now: Cell::new(start),
            step,
        }
    }

    /// Current time without advancing.
    pub fn current(&self) -> u32 {
        self.now.get()
    }

    /// Jump forward by `ms`.
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for TickClock {
    fn now_millis(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}
