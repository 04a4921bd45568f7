//! Log output over a serial port.
//!
//! Drains a [`LogStream`] into any `core::fmt::Write` sink, typically a
//! [`HardwareSerial`](crate::serial::HardwareSerial). Call it from the idle
//! loop; writing blocks on the transmitter, pushing never does.
//!
//! # Output Format
//!
//! ```text
//! [      1500] WARN: rx overrun: 3 bytes dropped
//! ```

use core::fmt::Write;

use crate::logging::{LogEntry, LogLevel, LogStream};

/// Format log entry into `buf`.
///
/// Format: `[timestamp_ms] LEVEL: message\r\n`. Returns bytes written
/// (truncated if `buf` is too small).
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = crate::logging::BufWriter { buf, pos: 0 };

    let _ = write!(
        writer,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_ms,
        entry.level.as_str(),
        entry.message()
    );

    writer.pos
}

/// Drain every pending entry of `stream`, writing those at `max_level` or
/// more severe to `out`.
///
/// Less severe entries are consumed and discarded. If messages were dropped
/// since the last drain, a warning line with the count follows and the
/// counter is reset. Returns the number of entries written.
pub fn drain_to<const N: usize>(stream: &LogStream<N>, max_level: LogLevel, out: &mut dyn Write) -> usize {
    let mut line = [0u8; 128];
    let mut count = 0;

    while let Some(entry) = stream.drain() {
        if entry.level > max_level {
            continue;
        }
        let len = format_log_entry(&entry, &mut line);
        // A truncated line may end mid-character; emit the valid prefix
        let text = match core::str::from_utf8(&line[..len]) {
            Ok(text) => text,
            Err(e) => core::str::from_utf8(&line[..e.valid_up_to()]).unwrap_or(""),
        };
        let _ = out.write_str(text);
        count += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let _ = write!(out, "[WARN] Dropped: {}\r\n", dropped);
        stream.reset_dropped();
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MAX_MSG_LEN;

    #[test]
    fn test_format_log_entry() {
        let entry = LogEntry {
            timestamp_ms: 1234567,
            level: LogLevel::Info,
            len: 11,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..11].copy_from_slice(b"Hello world");
                msg
            },
        };

        let mut buf = [0u8; 256];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] INFO: Hello world\r\n");
    }

    #[test]
    fn test_format_truncated_message() {
        let entry = LogEntry {
            timestamp_ms: 999,
            level: LogLevel::Error,
            len: 5,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..10].copy_from_slice(b"TEST12345X"); // Only first 5 used
                msg
            },
        };

        let mut buf = [0u8; 256];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("TEST1"));
        assert!(!formatted.contains('X'));
    }

    #[test]
    fn test_drain_to_reports_drops() {
        let stream = LogStream::<2>::new();
        stream.push(1, LogLevel::Info, b"a");
        stream.push(2, LogLevel::Warn, b"b");
        stream.push(3, LogLevel::Warn, b"lost");

        let mut out = String::new();
        assert_eq!(drain_to(&stream, LogLevel::Trace, &mut out), 2);

        assert!(out.contains("INFO: a"));
        assert!(out.contains("WARN: b"));
        assert!(out.ends_with("[WARN] Dropped: 1\r\n"));
        assert_eq!(stream.dropped(), 0);
        assert!(!stream.has_entries());
    }

    #[test]
    fn test_drain_to_filters_by_level() {
        let stream = LogStream::<8>::new();
        stream.push(1, LogLevel::Trace, b"timed read: no data");
        stream.push(2, LogLevel::Warn, b"rx overrun");
        stream.push(3, LogLevel::Debug, b"noise");
        stream.push(4, LogLevel::Info, b"ready");

        let mut out = String::new();
        assert_eq!(drain_to(&stream, LogLevel::Info, &mut out), 2);

        assert!(out.contains("WARN: rx overrun"));
        assert!(out.contains("INFO: ready"));
        assert!(!out.contains("TRACE"));
        assert!(!out.contains("DEBUG"));
        assert!(!stream.has_entries());
    }
}
