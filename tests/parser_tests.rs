//! Parser tests over real receive channels and wall-clock time

use core::fmt::Write;
use std::time::{Duration, Instant};

use proptest::prelude::*;
use rust_uart_stream::hal::{LoopbackTransmitter, TickClock};
use rust_uart_stream::{Clock, HardwareSerial, MultiTarget, Parser, RxChannel, SliceSource};

/// Host millisecond clock.
struct StdClock(Instant);

impl StdClock {
    fn new() -> Self {
        Self(Instant::now())
    }
}

impl Clock for StdClock {
    fn now_millis(&self) -> u32 {
        self.0.elapsed().as_millis() as u32
    }
}

#[test]
fn test_timed_read_waits_about_timeout() {
    let ch = RxChannel::<16>::new();
    let mut parser = Parser::new(&ch, StdClock::new());
    parser.set_timeout(30);

    let start = Instant::now();
    assert_eq!(parser.timed_read(), None);
    let waited = start.elapsed();

    // Millisecond truncation can shave up to 1 ms off the wait
    assert!(waited >= Duration::from_millis(29), "returned after {:?}", waited);
    assert!(waited < Duration::from_millis(500), "overshot: {:?}", waited);
}

#[test]
fn test_bytes_arriving_during_wait_are_picked_up() {
    let ch = RxChannel::<32>::new();

    std::thread::scope(|s| {
        s.spawn(|| {
            std::thread::sleep(Duration::from_millis(20));
            for &b in b"noise SET 42\n" {
                ch.on_byte_received(b);
            }
        });

        let mut parser = Parser::new(&ch, StdClock::new());
        parser.set_timeout(1000);
        assert!(parser.find(b"SET "));
        assert_eq!(parser.parse_int(), 42);
    });
}

#[test]
fn test_loopback_round_trip() {
    let rx = RxChannel::<64>::new();
    let mut serial = HardwareSerial::new(&rx, LoopbackTransmitter::new(&rx));
    write!(serial, "temp=-12.5;count=1,024\r\n").unwrap();
    assert_eq!(serial.transmitter_mut().sent(), 24);

    let mut parser = Parser::new(&rx, TickClock::new(0, 1));
    parser.set_timeout(10);

    assert!((parser.parse_float() + 12.5).abs() < 1e-4);
    assert!(parser.find(b"count="));
    assert_eq!(parser.parse_int_skipping(b','), 1024);

    let tail: heapless::String<8> = parser.read_string();
    assert_eq!(tail.as_str(), "\r\n");
}

#[test]
fn test_loopback_overrun_is_reported() {
    let rx = RxChannel::<16>::new();
    let mut serial = HardwareSerial::new(&rx, LoopbackTransmitter::new(&rx));

    serial.write_bytes(&[b'x'; 40]);
    assert_eq!(serial.available(), 15);
    assert_eq!(serial.take_overruns(), 25);
    assert_eq!(serial.take_overruns(), 0);
}

#[test]
fn test_find_multi_overlapping_prefix_on_channel() {
    let rx = RxChannel::<32>::new();
    for &b in b"11111112tail" {
        rx.on_byte_received(b);
    }

    let mut parser = Parser::new(&rx, TickClock::new(0, 1));
    parser.set_timeout(5);
    let mut targets = [MultiTarget::new(b"11112"), MultiTarget::new(b"tail")];

    assert_eq!(parser.find_multi(&mut targets), Some(0));
    assert_eq!(parser.find_multi(&mut targets), Some(1));
    assert_eq!(parser.available(), 0);
}

#[test]
fn test_find_until_on_line_protocol() {
    let mut parser = Parser::new(SliceSource::new(b"+CSQ: 17,99\r\nOK\r\n"), TickClock::new(0, 1));
    parser.set_timeout(5);

    assert!(parser.find_until(b"CSQ:", b"\r\n"));
    assert_eq!(parser.parse_int(), 17);
    assert_eq!(parser.parse_int(), 99);
    assert!(!parser.find_until(b"ERROR", b"\r\n"));
    assert!(parser.find(b"OK"));
}

/// Earliest end position of any pattern in `data`; ties go to the lowest index.
fn first_match(data: &[u8], patterns: &[Vec<u8>]) -> Option<(usize, usize)> {
    (1..=data.len()).find_map(|end| {
        patterns
            .iter()
            .position(|p| end >= p.len() && data[end - p.len()..end] == p[..])
            .map(|i| (i, end))
    })
}

proptest! {
    #[test]
    fn prop_find_multi_matches_naive_search(
        data in prop::collection::vec(0u8..3, 0..40),
        patterns in prop::collection::vec(prop::collection::vec(0u8..3, 1..6), 1..4),
    ) {
        let mut parser = Parser::new(SliceSource::new(&data), TickClock::new(0, 1));
        parser.set_timeout(2);
        let mut targets: Vec<MultiTarget<'_>> = patterns.iter().map(|p| MultiTarget::new(p)).collect();

        match first_match(&data, &patterns) {
            Some((index, end)) => {
                prop_assert_eq!(parser.find_multi(&mut targets), Some(index));
                prop_assert_eq!(parser.get_ref().remaining(), &data[end..]);
            }
            None => {
                prop_assert_eq!(parser.find_multi(&mut targets), None);
                prop_assert_eq!(parser.get_ref().remaining(), b"");
            }
        }
    }

    #[test]
    fn prop_parse_int_recovers_value(value in any::<i32>(), junk in "[a-z =:]{0,8}") {
        let text = format!("{}{};", junk, value);
        let mut parser = Parser::new(SliceSource::new(text.as_bytes()), TickClock::new(0, 1));
        parser.set_timeout(3);

        prop_assert_eq!(parser.parse_int(), value);
        prop_assert_eq!(parser.get_ref().remaining(), b";");
    }

    #[test]
    fn prop_read_bytes_never_exceeds_input(data in prop::collection::vec(any::<u8>(), 0..64), cap in 0usize..80) {
        let mut parser = Parser::new(SliceSource::new(&data), TickClock::new(0, 1));
        parser.set_timeout(2);
        let mut buf = vec![0u8; cap];

        let n = parser.read_bytes(&mut buf);
        prop_assert_eq!(n, cap.min(data.len()));
        prop_assert_eq!(&buf[..n], &data[..n]);
    }
}
