//! Hardware Abstraction Layer for RustUartStream.
//!
//! The core only needs two things from the hardware:
//! - a transmitter it can poll for readiness and hand one byte to
//! - a free-running millisecond clock
//!
//! Receive goes the other way: the RX interrupt calls
//! [`RxChannel::on_byte_received`](crate::channel::RxChannel::on_byte_received),
//! usually through [`PORTS`](crate::PORTS).

pub mod host;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use host::{LoopbackTransmitter, TickClock};

/// Transmit side of a UART.
pub trait Transmitter {
    /// True when the data register can take another byte.
    fn transmit_ready(&mut self) -> bool;

    /// Hand one byte to the hardware. Only called after `transmit_ready`.
    ///
    /// Returns `false` if the hardware rejected the byte.
    fn transmit_byte(&mut self, byte: u8) -> bool;
}

impl<T: Transmitter + ?Sized> Transmitter for &mut T {
    #[inline]
    fn transmit_ready(&mut self) -> bool {
        (**self).transmit_ready()
    }

    #[inline]
    fn transmit_byte(&mut self, byte: u8) -> bool {
        (**self).transmit_byte(byte)
    }
}

/// Monotonic millisecond clock.
///
/// The counter may wrap; callers compare with `wrapping_sub`, never with
/// absolute values.
pub trait Clock {
    fn now_millis(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_millis(&self) -> u32 {
        (**self).now_millis()
    }
}
