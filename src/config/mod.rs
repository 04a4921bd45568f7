//! Module: config
//!
//! Purpose: Link and parser configuration for RustUartStream.
//!
//! Architecture:
//! - Compile-time sizes and defaults live here as constants
//! - `SerialConfig` describes the transceiver setup handed to the HAL
//! - `ParserConfig` carries the wait bound for blocking reads
//!
//! Safety: plain data, no globals.

pub mod frame;

pub use frame::{DataBits, FrameFormat, Parity, StopBits};

use crate::error::SerialError;

/// Receive ring slots per port (one is kept free).
pub const RX_BUFFER_SIZE: usize = 128;

/// Default wait bound for timed reads, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

/// Default line speed.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Highest baud rate accepted by [`SerialConfig::validate`].
pub const MAX_BAUD_RATE: u32 = 5_000_000;

/// Transceiver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub format: FrameFormat,
}

impl SerialConfig {
    /// 8N1 at the given speed.
    pub const fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            format: FrameFormat::SERIAL_8N1,
        }
    }

    /// Replace the frame format.
    pub const fn with_format(mut self, format: FrameFormat) -> Self {
        self.format = format;
        self
    }

    /// Reject settings no UART can run.
    pub fn validate(&self) -> Result<(), SerialError> {
        if self.baud_rate == 0 || self.baud_rate > MAX_BAUD_RATE {
            return Err(SerialError::InvalidBaudRate);
        }
        Ok(())
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BAUD_RATE)
    }
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Wait bound for every timed primitive.
    pub timeout_ms: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
