//! Lock-free SPSC (Single Producer, Single Consumer) receive channel.
//!
//! Every byte the UART receives lands here first.
//!
//! # Architecture
//!
//! ```text
//! RX interrupt ──────▶ RxChannel ──────▶ foreground reader
//!  (producer)          (lock-free)        (consumer, Parser)
//! ```
//!
//! # Rules
//!
//! - Only the producer stores `head`, only the consumer stores `tail`
//! - The producer never blocks: a byte arriving on a full ring is dropped
//! - The newest byte is dropped, buffered bytes are never overwritten
//! - One slot stays empty so that `head == tail` always means "empty"

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicPtr, AtomicU32, AtomicUsize, Ordering};

use crate::config::RX_BUFFER_SIZE;

/// Interrupt-fed circular receive buffer.
///
/// `N` is the number of slots; `N - 1` bytes can be buffered. Any `N >= 1`
/// is accepted, a power of two just makes the wrap cheaper.
///
/// # Safety
///
/// This type uses `UnsafeCell` internally but is safe to use because:
/// - Exactly one producer calls [`on_byte_received`](Self::on_byte_received)
/// - Exactly one consumer calls [`read`](Self::read) / [`peek`](Self::peek) / [`flush`](Self::flush)
/// - A slot is written before `head` is published and read before `tail` is released
///
/// # Memory Ordering
///
/// - Producer loads `tail` with `Acquire`, stores `head` with `Release`
/// - Consumer loads `head` with `Acquire`, stores `tail` with `Release`
pub struct RxChannel<const N: usize = RX_BUFFER_SIZE> {
    /// Ring buffer of received bytes.
    slots: UnsafeCell<[u8; N]>,

    /// Next slot the producer writes.
    head: AtomicUsize,

    /// Next slot the consumer reads.
    tail: AtomicUsize,

    /// Bytes dropped because the ring was full.
    overruns: AtomicU32,

    /// Optional `fn()` run by the producer after each received byte.
    callback: AtomicPtr<()>,
}

// SAFETY: Single producer, single consumer, atomic index handoff.
// Each slot is owned by exactly one side at any time.
unsafe impl<const N: usize> Sync for RxChannel<N> {}
unsafe impl<const N: usize> Send for RxChannel<N> {}

impl<const N: usize> RxChannel<N> {
    /// Create a new empty channel.
    ///
    /// # Panics
    ///
    /// Panics at compile time (in const context) if `N` is zero.
    pub const fn new() -> Self {
        assert!(N > 0, "Channel size must be at least 1");

        Self {
            slots: UnsafeCell::new([0u8; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            overruns: AtomicU32::new(0),
            callback: AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    /// Store one received byte (producer context).
    ///
    /// Returns `true` if the byte was buffered, `false` if it was dropped
    /// because the ring is full. The attached callback, if any, runs in both
    /// cases after the byte has been handled.
    ///
    /// # Timing
    ///
    /// O(1), never blocks, never allocates. Safe to call from an ISR.
    #[inline]
    pub fn on_byte_received(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % N;

        let stored = if next != self.tail.load(Ordering::Acquire) {
            // SAFETY: slot `head` is not visible to the consumer until
            // `head` is published below.
            unsafe {
                (*self.slots.get())[head] = byte;
            }
            self.head.store(next, Ordering::Release);
            true
        } else {
            self.overruns.fetch_add(1, Ordering::Relaxed);
            false
        };

        let callback = self.callback.load(Ordering::Acquire);
        if !callback.is_null() {
            // SAFETY: the only non-null values ever stored come from
            // `attach_interrupt`, which casts a `fn()`.
            let callback = unsafe { core::mem::transmute::<*mut (), fn()>(callback) };
            callback();
        }

        stored
    }

    /// Number of unread bytes.
    #[inline]
    pub fn available(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Relaxed);
        (N + head - tail) % N
    }

    /// Check if there is nothing to read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Relaxed)
    }

    /// Take the next byte (consumer context).
    ///
    /// Returns `None` if the channel is empty.
    #[inline]
    pub fn read(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if self.head.load(Ordering::Acquire) == tail {
            return None;
        }

        // SAFETY: slot `tail` was published by the producer and is not
        // rewritten until `tail` moves past it.
        let byte = unsafe { (*self.slots.get())[tail] };
        self.tail.store((tail + 1) % N, Ordering::Release);
        Some(byte)
    }

    /// Look at the next byte without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if self.head.load(Ordering::Acquire) == tail {
            return None;
        }

        // SAFETY: as in `read`.
        Some(unsafe { (*self.slots.get())[tail] })
    }

    /// Discard every byte currently buffered.
    ///
    /// Bytes arriving while flushing may be discarded too.
    pub fn flush(&self) {
        while self.read().is_some() {}
    }

    /// Usable capacity (one slot is kept free).
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Bytes dropped since the last [`reset_overruns`](Self::reset_overruns).
    #[inline]
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }

    /// Reset the overrun counter (e.g., after reporting).
    #[inline]
    pub fn reset_overruns(&self) {
        self.overruns.store(0, Ordering::Relaxed);
    }

    /// Read and clear the overrun counter in one step.
    #[inline]
    pub fn take_overruns(&self) -> u32 {
        self.overruns.swap(0, Ordering::Relaxed)
    }

    /// Run `callback` in the producer context after every received byte.
    ///
    /// The callback must not read from this channel.
    pub fn attach_interrupt(&self, callback: fn()) {
        self.callback.store(callback as *mut (), Ordering::Release);
    }

    /// Remove the producer-side callback.
    pub fn detach_interrupt(&self) {
        self.callback.store(core::ptr::null_mut(), Ordering::Release);
    }
}

impl<const N: usize> Default for RxChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicU32;

    #[test]
    fn test_channel_basic_write_read() {
        let channel = RxChannel::<8>::new();

        assert!(channel.on_byte_received(b'a'));
        assert!(channel.on_byte_received(b'b'));

        assert_eq!(channel.available(), 2);
        assert_eq!(channel.read(), Some(b'a'));
        assert_eq!(channel.read(), Some(b'b'));
        assert_eq!(channel.read(), None);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_channel_full_drops_newest() {
        let channel = RxChannel::<4>::new();

        assert!(channel.on_byte_received(1));
        assert!(channel.on_byte_received(2));
        assert!(channel.on_byte_received(3));

        // Last slot is sacrificed
        assert!(!channel.on_byte_received(4));
        assert_eq!(channel.overruns(), 1);
        assert_eq!(channel.available(), 3);

        assert_eq!(channel.read(), Some(1));
        assert_eq!(channel.read(), Some(2));
        assert_eq!(channel.read(), Some(3));
        assert_eq!(channel.read(), None);
    }

    #[test]
    fn test_channel_wrap_around() {
        let channel = RxChannel::<3>::new();

        for round in 0..10u8 {
            assert!(channel.on_byte_received(round));
            assert!(channel.on_byte_received(round.wrapping_add(100)));
            assert_eq!(channel.available(), 2);
            assert_eq!(channel.read(), Some(round));
            assert_eq!(channel.read(), Some(round.wrapping_add(100)));
        }
        assert_eq!(channel.overruns(), 0);
    }

    #[test]
    fn test_channel_peek_is_idempotent() {
        let channel = RxChannel::<8>::new();
        assert_eq!(channel.peek(), None);

        channel.on_byte_received(b'x');
        assert_eq!(channel.peek(), Some(b'x'));
        assert_eq!(channel.peek(), Some(b'x'));
        assert_eq!(channel.available(), 1);
        assert_eq!(channel.read(), Some(b'x'));
        assert_eq!(channel.peek(), None);
    }

    #[test]
    fn test_channel_flush() {
        let channel = RxChannel::<16>::new();
        for b in b"hello" {
            channel.on_byte_received(*b);
        }

        channel.flush();
        assert_eq!(channel.available(), 0);
        assert_eq!(channel.read(), None);
    }

    #[test]
    fn test_channel_single_slot_holds_nothing() {
        let channel = RxChannel::<1>::new();
        assert_eq!(channel.capacity(), 0);
        assert!(!channel.on_byte_received(7));
        assert_eq!(channel.read(), None);
    }

    static CALLS: AtomicU32 = AtomicU32::new(0);

    fn count_call() {
        CALLS.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn test_channel_callback() {
        let channel = RxChannel::<4>::new();
        channel.attach_interrupt(count_call);

        channel.on_byte_received(1);
        channel.on_byte_received(2);
        assert_eq!(CALLS.load(Ordering::Relaxed), 2);

        channel.detach_interrupt();
        channel.on_byte_received(3);
        assert_eq!(CALLS.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_spsc_threaded_fifo() {
        use std::sync::Arc;
        use std::thread;

        let channel = Arc::new(RxChannel::<32>::new());
        let producer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                for i in 0..2000u32 {
                    let byte = (i % 251) as u8;
                    while !channel.on_byte_received(byte) {
                        thread::yield_now();
                    }
                }
            })
        };

        let mut expected = 0u32;
        while expected < 2000 {
            if let Some(byte) = channel.read() {
                assert_eq!(byte, (expected % 251) as u8, "FIFO order broken");
                expected += 1;
            }
        }

        producer.join().unwrap();
        assert!(channel.is_empty());
    }
}
