//! Port registry: hardware port id → receive channel.
//!
//! Interrupt vectors cannot take arguments, so each RX handler needs a way
//! to find its channel. Instead of one global object per UART, the firmware
//! registers each port's `'static` channel here once at startup and the
//! interrupt path looks it up by id.
//!
//! ```ignore
//! static UART1_RX: RxChannel = RxChannel::new();
//!
//! PORTS.register(PortId::UART1, &UART1_RX)?;
//!
//! // in the UART1 RX interrupt:
//! PORTS.dispatch(PortId::UART1, byte);
//! ```
//!
//! Lookups are a single atomic load, safe from interrupt context.

use core::sync::atomic::{AtomicPtr, Ordering};

use crate::channel::RxChannel;
use crate::error::SerialError;

/// Number of ports in the global table.
pub const MAX_PORTS: usize = 4;

/// Hardware UART identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortId(pub u8);

impl PortId {
    pub const UART0: Self = Self(0);
    pub const UART1: Self = Self(1);
    pub const UART2: Self = Self(2);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for PortId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "UART{}", self.0)
    }
}

/// Fixed table of `'static` receive channels.
///
/// Each slot is written once (CAS from null) and read lock-free.
pub struct PortRegistry<const P: usize = MAX_PORTS> {
    slots: [AtomicPtr<RxChannel>; P],
}

impl<const P: usize> PortRegistry<P> {
    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY_SLOT: AtomicPtr<RxChannel> = AtomicPtr::new(core::ptr::null_mut());

    pub const fn new() -> Self {
        Self {
            slots: [Self::EMPTY_SLOT; P],
        }
    }

    /// Bind `channel` to `id`.
    ///
    /// Fails with `PortOutOfRange` if `id` has no slot and `PortInUse` if a
    /// channel is already bound.
    pub fn register(&self, id: PortId, channel: &'static RxChannel) -> Result<(), SerialError> {
        let slot = self.slots.get(id.index()).ok_or(SerialError::PortOutOfRange)?;
        let ptr = channel as *const RxChannel as *mut RxChannel;

        slot.compare_exchange(core::ptr::null_mut(), ptr, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| SerialError::PortInUse)
    }

    /// Release the slot for `id`. Returns the channel that was bound.
    ///
    /// Mask the port's interrupt first; a dispatch racing with this call
    /// may still deliver to the old channel.
    pub fn unregister(&self, id: PortId) -> Option<&'static RxChannel> {
        let slot = self.slots.get(id.index())?;
        let ptr = slot.swap(core::ptr::null_mut(), Ordering::AcqRel);
        // SAFETY: only `&'static RxChannel` values are ever stored.
        unsafe { ptr.as_ref() }
    }

    /// Channel bound to `id`, if any.
    #[inline]
    pub fn get(&self, id: PortId) -> Option<&'static RxChannel> {
        let ptr = self.slots.get(id.index())?.load(Ordering::Acquire);
        // SAFETY: only `&'static RxChannel` values are ever stored.
        unsafe { ptr.as_ref() }
    }

    /// Interrupt entry point: deliver one received byte to `id`'s channel.
    ///
    /// Returns `false` if no channel is registered or the byte was dropped.
    #[inline]
    pub fn dispatch(&self, id: PortId, byte: u8) -> bool {
        match self.get(id) {
            Some(channel) => channel.on_byte_received(byte),
            None => false,
        }
    }

    /// Number of slots.
    pub const fn len(&self) -> usize {
        P
    }

    pub const fn is_empty(&self) -> bool {
        P == 0
    }
}

impl<const P: usize> Default for PortRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CH_A: RxChannel = RxChannel::new();
    static CH_B: RxChannel = RxChannel::new();

    #[test]
    fn test_register_and_dispatch() {
        let registry = PortRegistry::<2>::new();
        registry.register(PortId::UART0, &CH_A).unwrap();

        assert!(registry.dispatch(PortId::UART0, b'k'));
        assert!(!registry.dispatch(PortId::UART1, b'k'));
        assert_eq!(registry.get(PortId::UART0).unwrap().read(), Some(b'k'));
        assert!(registry.get(PortId::UART1).is_none());
    }

    #[test]
    fn test_register_twice_fails() {
        let registry = PortRegistry::<2>::new();
        registry.register(PortId::UART1, &CH_B).unwrap();
        assert_eq!(registry.register(PortId::UART1, &CH_B), Err(SerialError::PortInUse));

        assert!(registry.unregister(PortId::UART1).is_some());
        assert!(registry.register(PortId::UART1, &CH_B).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let registry = PortRegistry::<2>::new();
        assert_eq!(
            registry.register(PortId::UART2, &CH_A),
            Err(SerialError::PortOutOfRange)
        );
        assert!(!registry.dispatch(PortId(9), 0));
        assert!(registry.unregister(PortId(9)).is_none());
    }
}
