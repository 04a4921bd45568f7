//! UART frame format (word length, parity, stop bits).
//!
//! Mnemonics follow the usual `<data><parity><stop>` shape: `8N1`, `9E2`,
//! `8O1.5`. Parity is `N` (none), `E` (even) or `O` (odd).

use core::str::FromStr;

use crate::error::SerialError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Eight,
    Nine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    Half,
    One,
    OneAndHalf,
    Two,
}

/// Complete frame description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl FrameFormat {
    pub const SERIAL_8N1: Self = Self::new(DataBits::Eight, Parity::None, StopBits::One);
    pub const SERIAL_8N2: Self = Self::new(DataBits::Eight, Parity::None, StopBits::Two);
    pub const SERIAL_8E1: Self = Self::new(DataBits::Eight, Parity::Even, StopBits::One);
    pub const SERIAL_8E2: Self = Self::new(DataBits::Eight, Parity::Even, StopBits::Two);
    pub const SERIAL_8O1: Self = Self::new(DataBits::Eight, Parity::Odd, StopBits::One);
    pub const SERIAL_8O2: Self = Self::new(DataBits::Eight, Parity::Odd, StopBits::Two);
    pub const SERIAL_9N1: Self = Self::new(DataBits::Nine, Parity::None, StopBits::One);
    pub const SERIAL_9E1: Self = Self::new(DataBits::Nine, Parity::Even, StopBits::One);
    pub const SERIAL_9O1: Self = Self::new(DataBits::Nine, Parity::Odd, StopBits::One);

    pub const fn new(data_bits: DataBits, parity: Parity, stop_bits: StopBits) -> Self {
        Self {
            data_bits,
            parity,
            stop_bits,
        }
    }
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self::SERIAL_8N1
    }
}

impl FromStr for FrameFormat {
    type Err = SerialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bytes = s.as_bytes();
        if bytes.len() < 3 {
            return Err(SerialError::InvalidFrameFormat);
        }

        let data_bits = match bytes[0] {
            b'8' => DataBits::Eight,
            b'9' => DataBits::Nine,
            _ => return Err(SerialError::InvalidFrameFormat),
        };

        let parity = match bytes[1].to_ascii_uppercase() {
            b'N' => Parity::None,
            b'E' => Parity::Even,
            b'O' => Parity::Odd,
            _ => return Err(SerialError::InvalidFrameFormat),
        };

        let stop_bits = match &s[2..] {
            "0.5" => StopBits::Half,
            "1" => StopBits::One,
            "1.5" => StopBits::OneAndHalf,
            "2" => StopBits::Two,
            _ => return Err(SerialError::InvalidFrameFormat),
        };

        Ok(Self::new(data_bits, parity, stop_bits))
    }
}

impl core::fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let data = match self.data_bits {
            DataBits::Eight => '8',
            DataBits::Nine => '9',
        };
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        let stop = match self.stop_bits {
            StopBits::Half => "0.5",
            StopBits::One => "1",
            StopBits::OneAndHalf => "1.5",
            StopBits::Two => "2",
        };
        write!(f, "{}{}{}", data, parity, stop)
    }
}
