//! RustUartStream - UART1 command echo firmware
//!
//! 1. Bring up UART1 (GPIO17 TX, GPIO18 RX) at 115200 8N1
//! 2. Register the port's receive channel in `PORTS`
//! 3. Start the RX pump task on Core 0: driver FIFO → `PORTS.dispatch`
//! 4. Foreground: parse commands, answer, drain the log
//!
//! Commands (any line noise between them is skipped):
//!
//! ```text
//! SET <int>     → "value=<int>"
//! ECHO <text>\n → "<text>"
//! PING          → "PONG"
//! ```

#![no_std]
#![no_main]

use esp_idf_svc::sys as esp_idf_sys;

use core::ffi::c_void;
use core::fmt::Write;

use esp_idf_svc::hal::delay::BLOCK;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::UartRxDriver;

use rust_uart_stream::hal::esp32::{init_uart, EspClock, EspUartTransmitter};
use rust_uart_stream::logging::LogLevel;
use rust_uart_stream::{
    log_drain, rt_info, rt_warn, Clock, HardwareSerial, MultiTarget, Parser, PortId, RxChannel,
    SerialConfig, PORTS, SERIAL_LOG, VERSION,
};

static UART1_RX: RxChannel = RxChannel::new();

const PUMP_STACK_SIZE: u32 = 4096;
const PUMP_PRIORITY: u32 = 10;

/// Least severe level written to the command port. Idle parser timeouts
/// are logged at trace level and stay off the wire.
const PORT_LOG_LEVEL: LogLevel = LogLevel::Info;

#[no_mangle]
fn main() {
    esp_idf_sys::link_patches();

    let Ok(peripherals) = Peripherals::take() else {
        halt();
    };

    let config = SerialConfig::default();
    let uart = match init_uart(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        &config,
    ) {
        Ok(uart) => uart,
        Err(_) => halt(),
    };
    let (tx, mut rx) = uart.into_split();

    if PORTS.register(PortId::UART1, &UART1_RX).is_err() {
        halt();
    }

    // SAFETY: `rx` lives on main's stack and main never returns, so the
    // pointer stays valid for the pump task's whole life. Only the pump
    // task touches it after this point.
    unsafe {
        esp_idf_sys::xTaskCreatePinnedToCore(
            Some(rx_pump_task),
            c"uart_rx".as_ptr(),
            PUMP_STACK_SIZE,
            &mut rx as *mut UartRxDriver<'_> as *mut c_void,
            PUMP_PRIORITY,
            core::ptr::null_mut(),
            0,
        );
    }

    let clock = EspClock;
    let mut serial = HardwareSerial::new(&UART1_RX, EspUartTransmitter::new(tx));
    let mut parser = Parser::new(&UART1_RX, clock).with_log(&SERIAL_LOG);

    rt_info!(
        SERIAL_LOG,
        clock.now_millis(),
        "{} on UART1 at {} baud {}",
        VERSION,
        config.baud_rate,
        config.format
    );

    loop {
        let mut commands = [
            MultiTarget::new(b"SET "),
            MultiTarget::new(b"ECHO "),
            MultiTarget::new(b"PING"),
        ];

        match parser.find_multi(&mut commands) {
            Some(0) => {
                let value = parser.parse_int();
                let _ = write!(serial, "value={}\r\n", value);
            }
            Some(1) => {
                let text: heapless::String<64> = parser.read_string_until(b'\n');
                let _ = write!(serial, "{}\r\n", text.trim_end());
            }
            Some(2) => {
                serial.write_bytes(b"PONG\r\n");
            }
            _ => {}
        }

        let lost = serial.take_overruns();
        if lost > 0 {
            rt_warn!(SERIAL_LOG, clock.now_millis(), "rx overrun: {} bytes dropped", lost);
        }
        let rejected = serial.take_tx_errors();
        if rejected > 0 {
            rt_warn!(SERIAL_LOG, clock.now_millis(), "tx error: {} bytes rejected", rejected);
        }

        log_drain::drain_to(&SERIAL_LOG, PORT_LOG_LEVEL, &mut serial);
    }
}

/// RX pump task (Core 0).
///
/// Blocks in the driver until bytes arrive, then hands each one to the
/// registry exactly like an RX interrupt would.
unsafe extern "C" fn rx_pump_task(arg: *mut c_void) {
    // SAFETY: see the spawn site in `main`.
    let rx = unsafe { &mut *(arg as *mut UartRxDriver<'static>) };
    let mut buf = [0u8; 64];

    loop {
        match rx.read(&mut buf, BLOCK) {
            Ok(n) => {
                for &byte in &buf[..n] {
                    PORTS.dispatch(PortId::UART1, byte);
                }
            }
            Err(_) => unsafe {
                esp_idf_sys::vTaskDelay(1);
            },
        }
    }
}

/// Unrecoverable bring-up failure: restart the chip.
fn halt() -> ! {
    unsafe {
        esp_idf_sys::esp_restart();
    }
    #[allow(unreachable_code)]
    loop {}
}
