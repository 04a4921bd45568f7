//! Serial setup error types
//!
//! The read side never fails: "no data" and "timed out" are sentinels
//! (`None`, `false`, `0`). Only configuration and port wiring can fail.

/// Serial error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// E01: Port id beyond the registry table
    PortOutOfRange,
    /// E02: Port already has a channel registered
    PortInUse,
    /// E03: Frame format mnemonic not understood
    InvalidFrameFormat,
    /// E04: Baud rate is zero or above the supported maximum
    InvalidBaudRate,
}

impl SerialError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::PortOutOfRange => "E01",
            Self::PortInUse => "E02",
            Self::InvalidFrameFormat => "E03",
            Self::InvalidBaudRate => "E04",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::PortOutOfRange => "port out of range",
            Self::PortInUse => "port already registered",
            Self::InvalidFrameFormat => "invalid frame format",
            Self::InvalidBaudRate => "invalid baud rate",
        }
    }
}

impl core::fmt::Display for SerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
