//! Millisecond time sources.
//!
//! The engine only ever looks at differences between two readings, taken
//! with wrapping subtraction. A `u64` millisecond counter will not wrap in
//! the lifetime of a device; if a host clock does wrap, readings stay
//! correct as long as no single interval spans more than half the range.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A monotonic millisecond counter.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_millis(&self) -> u64;
}

/// Milliseconds elapsed from `earlier` to `later`.
#[inline]
pub fn elapsed(later: u64, earlier: u64) -> u64 {
    later.wrapping_sub(earlier)
}

/// Wall time, measured from when the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same counter, so a test can keep one handle and give
/// another to an engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// A clock reading `start`.
    pub fn new(start: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::Relaxed);
    }

    /// Move forward by `millis`, returning the new reading.
    pub fn advance(&self, millis: u64) -> u64 {
        self.now
            .fetch_add(millis, Ordering::Relaxed)
            .wrapping_add(millis)
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}
