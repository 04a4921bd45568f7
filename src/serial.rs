//! Hardware serial port: interrupt-fed receive channel + polled transmitter.
//!
//! # Data Flow
//!
//! ```text
//! RX pin ─▶ ISR ─▶ RxChannel ─▶ read()/peek()/Parser
//! write() ─▶ wait transmit_ready ─▶ transmit_byte ─▶ TX pin
//! ```
//!
//! Transmission is not buffered: `write` spins until the hardware takes
//! the byte, so backpressure lands directly on the caller. There is no
//! timeout on that wait; a stuck transmitter is a hardware fault.

use crate::channel::RxChannel;
use crate::config::RX_BUFFER_SIZE;
use crate::hal::Transmitter;
use crate::stream::ByteSource;

/// One UART: a borrowed receive channel and an owned transmitter.
pub struct HardwareSerial<'a, T: Transmitter, const N: usize = RX_BUFFER_SIZE> {
    rx: &'a RxChannel<N>,
    tx: T,
    /// Bytes the transmitter rejected since the last `take_tx_errors`.
    tx_errors: u32,
}

impl<'a, T: Transmitter, const N: usize> HardwareSerial<'a, T, N> {
    pub fn new(rx: &'a RxChannel<N>, tx: T) -> Self {
        Self { rx, tx, tx_errors: 0 }
    }

    /// Transmit one byte, spinning until the hardware is ready.
    ///
    /// Returns the number of bytes accepted: 1, or 0 if the hardware
    /// rejected it (counted, see [`take_tx_errors`](Self::take_tx_errors)).
    pub fn write(&mut self, byte: u8) -> usize {
        while !self.tx.transmit_ready() {
            core::hint::spin_loop();
        }
        if self.tx.transmit_byte(byte) {
            1
        } else {
            self.tx_errors = self.tx_errors.saturating_add(1);
            0
        }
    }

    /// Transmit every byte of `bytes`. Returns the count accepted.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().map(|&b| self.write(b)).sum()
    }

    /// Unread received bytes.
    #[inline]
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    #[inline]
    pub fn read(&mut self) -> Option<u8> {
        self.rx.read()
    }

    #[inline]
    pub fn peek(&mut self) -> Option<u8> {
        self.rx.peek()
    }

    /// Discard buffered received bytes. Transmission is unaffected.
    pub fn flush(&mut self) {
        self.rx.flush();
    }

    /// Bytes lost to a full receive ring since the last call; resets the count.
    pub fn take_overruns(&self) -> u32 {
        self.rx.take_overruns()
    }

    /// Bytes the transmitter rejected since the last call; resets the count.
    pub fn take_tx_errors(&mut self) -> u32 {
        core::mem::take(&mut self.tx_errors)
    }

    pub fn channel(&self) -> &'a RxChannel<N> {
        self.rx
    }

    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.tx
    }

    pub fn into_transmitter(self) -> T {
        self.tx
    }
}

impl<T: Transmitter, const N: usize> ByteSource for HardwareSerial<'_, T, N> {
    #[inline]
    fn available(&self) -> usize {
        self.rx.available()
    }

    #[inline]
    fn read(&mut self) -> Option<u8> {
        self.rx.read()
    }

    #[inline]
    fn peek(&mut self) -> Option<u8> {
        self.rx.peek()
    }
}

impl<T: Transmitter, const N: usize> core::fmt::Write for HardwareSerial<'_, T, N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        if self.write_bytes(s.as_bytes()) == s.len() {
            Ok(())
        } else {
            Err(core::fmt::Error)
        }
    }
}
