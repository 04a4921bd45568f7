//! Global instances shared between interrupt handlers and the foreground.
//!
//! One registry for all UART ports, one log stream for the foreground.

use crate::logging::LogStream;
use crate::registry::{PortRegistry, MAX_PORTS};

/// Port table consulted by the RX interrupt dispatch path.
///
/// Populated once at startup with each port's `'static` channel.
pub static PORTS: PortRegistry<MAX_PORTS> = PortRegistry::new();

/// Foreground log stream.
///
/// Single producer (foreground parsing code), single consumer
/// (`log_drain::drain_to` from the idle loop).
pub static SERIAL_LOG: LogStream = LogStream::new();
