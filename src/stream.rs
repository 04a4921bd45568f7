//! Byte source contract consumed by the [`Parser`](crate::parser::Parser).
//!
//! Anything that can report pending bytes, hand out the next one and peek
//! at it without consuming can be parsed: the receive channel, a serial
//! port wrapping it, or a test double.

use crate::channel::RxChannel;

/// Non-blocking byte source.
///
/// None of the methods may block. "Nothing available" is `None`,
/// never an error.
pub trait ByteSource {
    /// Number of bytes that can be read right now.
    fn available(&self) -> usize;

    /// Take the next byte.
    fn read(&mut self) -> Option<u8>;

    /// Look at the next byte without consuming it.
    fn peek(&mut self) -> Option<u8>;
}

impl<const N: usize> ByteSource for RxChannel<N> {
    #[inline]
    fn available(&self) -> usize {
        RxChannel::available(self)
    }

    #[inline]
    fn read(&mut self) -> Option<u8> {
        RxChannel::read(self)
    }

    #[inline]
    fn peek(&mut self) -> Option<u8> {
        RxChannel::peek(self)
    }
}

impl<const N: usize> ByteSource for &RxChannel<N> {
    #[inline]
    fn available(&self) -> usize {
        RxChannel::available(self)
    }

    #[inline]
    fn read(&mut self) -> Option<u8> {
        RxChannel::read(self)
    }

    #[inline]
    fn peek(&mut self) -> Option<u8> {
        RxChannel::peek(self)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn available(&self) -> usize {
        (**self).available()
    }

    #[inline]
    fn read(&mut self) -> Option<u8> {
        (**self).read()
    }

    #[inline]
    fn peek(&mut self) -> Option<u8> {
        (**self).peek()
    }
}

/// In-memory source over a byte slice.
///
/// Every byte is available immediately; once exhausted it behaves like an
/// idle line. Handy for parsing data that has already been received.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn available(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read(&mut self) -> Option<u8> {
        let byte = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    fn peek(&mut self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }
}
