//! # Clock
//!
//! Time source for the input dispatcher's cooldown window.
//!
//! Cooldowns never sleep: they compare a stored timestamp with "now". Hosts use
//! [`MonotonicClock`]; tests drive a [`ManualClock`] to step time exactly.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic millisecond time source.
pub trait Clock: fmt::Debug {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Wall-clock time measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock at zero.
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
/// # Examples
///
/// ```
/// use delve::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// clock.advance(250);
/// assert_eq!(clock.now_millis(), 250);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `millis`.
    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }

    /// Sets the current time.
    pub fn set(&self, millis: u64) {
        self.now.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}
