//! # RustUartStream
//!
//! Interrupt-fed serial receive channels with timeout-bounded parsing.
//!
//! ## Architecture
//!
//! ```text
//! RX interrupt ──▶ PORTS.dispatch ──▶ RxChannel (SPSC ring) ──▶ Parser
//!                                                              (find, parse_int, ...)
//! ```
//!
//! - The interrupt side only ever calls [`RxChannel::on_byte_received`]
//! - The foreground reads through [`ByteSource`], optionally wrapped in a
//!   [`Parser`] that adds bounded waits
//! - No allocation, no locks; a full ring drops the newest byte and counts it

#![cfg_attr(not(test), no_std)]

pub mod channel;
pub mod config;
pub mod error;
pub mod globals;
pub mod hal;
pub mod log_drain;
pub mod logging;
pub mod parser;
pub mod registry;
pub mod serial;
pub mod stream;

pub use channel::RxChannel;
pub use config::{FrameFormat, ParserConfig, SerialConfig};
pub use error::SerialError;
pub use globals::{PORTS, SERIAL_LOG};
pub use hal::{Clock, Transmitter};
pub use parser::{MultiTarget, Parser};
pub use registry::{PortId, PortRegistry};
pub use serial::HardwareSerial;
pub use stream::{ByteSource, SliceSource};

/// Firmware version string stamped by the build script.
pub const VERSION: &str = env!("VERSION_STRING");
