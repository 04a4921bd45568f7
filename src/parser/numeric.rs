//! Numeric token extraction.
//!
//! The grammar is deliberately lenient: leading junk is skipped, the token
//! ends at the first byte that cannot continue it, and whatever was
//! accumulated is returned. Nothing is ever rejected.
//!
//! - A `'-'` counts only as the first byte of the token; a later one ends it.
//! - An optional skip byte (e.g. a thousands separator) is consumed and ignored.
//! - In floats, every `'.'` continues the token but only the first one
//!   matters: `"1.2.3"` parses as `1.23`.

use super::Parser;
use crate::hal::Clock;
use crate::stream::ByteSource;

impl<S: ByteSource, C: Clock> Parser<S, C> {
    /// Peek at the next digit or `'-'`, consuming anything else on the way.
    ///
    /// `None` if the timeout expires first.
    pub fn peek_next_digit(&mut self) -> Option<u8> {
        loop {
            let c = self.timed_peek()?;
            if c == b'-' || c.is_ascii_digit() {
                return Some(c);
            }
            self.source.read();
        }
    }

    /// First integer in the stream. `0` if no digit arrives in time.
    pub fn parse_int(&mut self) -> i32 {
        self.scan_number(None, false).integer()
    }

    /// As [`parse_int`](Self::parse_int) with `skip` ignored inside the token.
    pub fn parse_int_skipping(&mut self, skip: u8) -> i32 {
        self.scan_number(Some(skip), false).integer()
    }

    /// First decimal number in the stream. `0.0` if no digit arrives in time.
    pub fn parse_float(&mut self) -> f32 {
        self.scan_number(None, true).float()
    }

    /// As [`parse_float`](Self::parse_float) with `skip` ignored inside the token.
    pub fn parse_float_skipping(&mut self, skip: u8) -> f32 {
        self.scan_number(Some(skip), true).float()
    }

    fn scan_number(&mut self, skip: Option<u8>, fractional: bool) -> NumberScan {
        let mut scan = NumberScan::default();

        let Some(mut c) = self.peek_next_digit() else {
            return scan;
        };

        loop {
            if Some(c) == skip {
                // ignored
            } else if c == b'-' {
                scan.negative = true;
            } else if fractional && c == b'.' {
                scan.seen_point = true;
            } else if c.is_ascii_digit() {
                scan.value = scan.value.wrapping_mul(10).wrapping_add(i32::from(c - b'0'));
                if scan.seen_point {
                    scan.fraction *= 0.1;
                }
            }
            self.source.read();

            match self.timed_peek() {
                Some(next)
                    if next.is_ascii_digit()
                        || Some(next) == skip
                        || (fractional && next == b'.') =>
                {
                    c = next
                }
                _ => break,
            }
        }

        scan
    }
}

/// Accumulator for one numeric token.
struct NumberScan {
    value: i32,
    negative: bool,
    seen_point: bool,
    fraction: f32,
}

impl Default for NumberScan {
    fn default() -> Self {
        Self {
            value: 0,
            negative: false,
            seen_point: false,
            fraction: 1.0,
        }
    }
}

impl NumberScan {
    fn integer(&self) -> i32 {
        if self.negative {
            self.value.wrapping_neg()
        } else {
            self.value
        }
    }

    fn float(&self) -> f32 {
        let value = self.integer() as f32;
        if self.seen_point {
            value * self.fraction
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::hal::TickClock;
    use crate::parser::Parser;
    use crate::stream::SliceSource;

    fn parser(data: &[u8]) -> Parser<SliceSource<'_>, TickClock> {
        let mut p = Parser::new(SliceSource::new(data), TickClock::new(0, 1));
        p.set_timeout(5);
        p
    }

    #[test]
    fn test_peek_next_digit_discards_junk() {
        let mut p = parser(b"ab -7");
        assert_eq!(p.peek_next_digit(), Some(b'-'));
        assert_eq!(p.get_ref().remaining(), b"-7");

        let mut p = parser(b"xyz");
        assert_eq!(p.peek_next_digit(), None);
        assert_eq!(p.get_ref().remaining(), b"");
    }

    #[test]
    fn test_parse_int_basic() {
        assert_eq!(parser(b"42").parse_int(), 42);
        assert_eq!(parser(b"  -123abc").parse_int(), -123);
        assert_eq!(parser(b"temp=19C").parse_int(), 19);
    }

    #[test]
    fn test_parse_int_leaves_terminator() {
        let mut p = parser(b"12,34");
        assert_eq!(p.parse_int(), 12);
        assert_eq!(p.get_ref().remaining(), b",34");
        assert_eq!(p.parse_int(), 34);
    }

    #[test]
    fn test_parse_int_with_skip_char() {
        let mut p = parser(b"-123,");
        assert_eq!(p.parse_int_skipping(b','), -123);
        assert_eq!(p.get_ref().remaining(), b"");

        assert_eq!(parser(b"1,000,000 ").parse_int_skipping(b','), 1_000_000);
    }

    #[test]
    fn test_parse_int_timeout_is_zero() {
        assert_eq!(parser(b"abc").parse_int(), 0);
        assert_eq!(parser(b"").parse_int(), 0);
    }

    #[test]
    fn test_parse_int_second_minus_ends_token() {
        let mut p = parser(b"-5-3");
        assert_eq!(p.parse_int(), -5);
        assert_eq!(p.get_ref().remaining(), b"-3");
        assert_eq!(p.parse_int(), -3);
    }

    #[test]
    fn test_parse_int_lone_minus() {
        let mut p = parser(b"-x");
        assert_eq!(p.parse_int(), 0);
        assert_eq!(p.get_ref().remaining(), b"x");
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_parse_float_basic() {
        let mut p = parser(b"3.14,");
        assert!((p.parse_float() - 3.14).abs() < 1e-5);
        assert_eq!(p.get_ref().remaining(), b",");
        assert!((parser(b"-0.5").parse_float() + 0.5).abs() < 1e-6);
        assert_eq!(parser(b"17 ").parse_float(), 17.0);
    }

    #[test]
    fn test_parse_float_second_point_is_lenient() {
        let v = parser(b"1.2.3").parse_float();
        assert!((v - 1.23).abs() < 1e-5, "got {}", v);
    }

    #[test]
    fn test_parse_float_with_skip_char() {
        let v = parser(b"1,234.5;").parse_float_skipping(b',');
        assert!((v - 1234.5).abs() < 1e-3, "got {}", v);
    }

    #[test]
    fn test_parse_float_timeout_is_zero() {
        assert_eq!(parser(b"none").parse_float(), 0.0);
    }
}
