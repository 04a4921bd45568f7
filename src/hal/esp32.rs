//! ESP-IDF bindings for the UART transmitter and millisecond clock.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32 UART1 TX ──────▶ peer RX
//! ESP32 UART1 RX ◀────── peer TX
//! ```
//!
//! The ESP-IDF driver owns the RX interrupt and its FIFO; a pump task
//! drains the driver and feeds the port's channel (see `main.rs`).

use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use super::{Clock, Transmitter};
use crate::config::{DataBits, Parity, SerialConfig, StopBits};
use crate::error::SerialError;

/// Translate a [`SerialConfig`] into the ESP-IDF driver configuration.
///
/// The ESP32 UART has no 9-bit word or half stop bit.
pub fn config_for(config: &SerialConfig) -> Result<uart::config::Config, SerialError> {
    config.validate()?;

    let data_bits = match config.format.data_bits {
        DataBits::Eight => uart::config::DataBits::DataBits8,
        DataBits::Nine => return Err(SerialError::InvalidFrameFormat),
    };
    let stop_bits = match config.format.stop_bits {
        StopBits::One => uart::config::StopBits::STOP1,
        StopBits::OneAndHalf => uart::config::StopBits::STOP1P5,
        StopBits::Two => uart::config::StopBits::STOP2,
        StopBits::Half => return Err(SerialError::InvalidFrameFormat),
    };

    let base = uart::config::Config::default()
        .baudrate(Hertz(config.baud_rate))
        .data_bits(data_bits)
        .stop_bits(stop_bits);

    Ok(match config.format.parity {
        Parity::None => base.parity_none(),
        Parity::Even => base.parity_even(),
        Parity::Odd => base.parity_odd(),
    })
}

/// UART bring-up errors
#[derive(Debug)]
pub enum UartInitError {
    /// Settings the ESP32 UART cannot run
    Config(SerialError),
    /// Driver installation failed
    Driver(EspError),
}

impl From<SerialError> for UartInitError {
    fn from(e: SerialError) -> Self {
        UartInitError::Config(e)
    }
}

impl From<EspError> for UartInitError {
    fn from(e: EspError) -> Self {
        UartInitError::Driver(e)
    }
}

/// Initialize UART1 in full duplex without flow control.
pub fn init_uart<'d>(
    uart: impl Peripheral<P = uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
    config: &SerialConfig,
) -> Result<UartDriver<'d>, UartInitError> {
    let uart_config = config_for(config)?;

    let driver = UartDriver::new(
        uart,
        tx_pin,
        rx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )?;
    Ok(driver)
}

/// Transmitter over the TX half of an ESP-IDF UART driver.
///
/// The driver queues into its own TX ring, so the line is always "ready";
/// `transmit_byte` blocks inside the driver when that ring is full and
/// reports a driver error as a rejected byte.
pub struct EspUartTransmitter<'d> {
    tx: uart::UartTxDriver<'d>,
}

impl<'d> EspUartTransmitter<'d> {
    pub fn new(tx: uart::UartTxDriver<'d>) -> Self {
        Self { tx }
    }
}

impl Transmitter for EspUartTransmitter<'_> {
    fn transmit_ready(&mut self) -> bool {
        true
    }

    fn transmit_byte(&mut self, byte: u8) -> bool {
        matches!(self.tx.write(&[byte]), Ok(1))
    }
}

/// Millisecond clock backed by `esp_timer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EspClock;

impl Clock for EspClock {
    fn now_millis(&self) -> u32 {
        // SAFETY: esp_timer_get_time is always safe to call
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        (us / 1000) as u32
    }
}
