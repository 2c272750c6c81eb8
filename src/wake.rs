//! Event flag raised by the pin-change interrupt.

use core::sync::atomic::{AtomicBool, Ordering};

/// Set by the edge interrupt, cleared by the main loop once the readout is done.
///
/// Only plain loads and stores are used, so the flag works on cores without
/// atomic read-modify-write (thumbv6m).
#[derive(Debug, Default)]
pub struct WakeFlag {
    raised: AtomicBool,
}

impl WakeFlag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// The entire body of the edge interrupt handler.
    #[inline]
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    #[inline]
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }
}
