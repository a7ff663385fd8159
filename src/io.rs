//! Collaborator interfaces between the coordination core and the board
//!
//! The core never touches pins or timers directly. It samples button levels,
//! drives the status outputs and reads the monotonic clock through these
//! traits, and suspends through `embedded_hal_async::delay::DelayNs`.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::digital::{OutputPin, PinState};
use heapless::Vec;

use crate::error::{Error, Result};
use crate::types::SourceId;

/// Instantaneous, non-blocking button level reads, safe from any context
pub trait InputLevels {
    /// True while `source` is held down (active-low already normalized)
    fn is_asserted(&self, source: SourceId) -> bool;

    fn both_asserted(&self) -> bool {
        SourceId::ALL.iter().all(|&source| self.is_asserted(source))
    }

    fn any_asserted(&self) -> bool {
        SourceId::ALL.iter().any(|&source| self.is_asserted(source))
    }
}

/// Status output shared by several tasks
pub trait Indicator {
    fn drive(&self, on: bool);
}

/// Monotonic millisecond clock
pub trait Monotonic {
    /// Milliseconds since boot; wraps after ~49 days
    fn now_ms(&self) -> u32;
}

impl<T: InputLevels + ?Sized> InputLevels for &T {
    fn is_asserted(&self, source: SourceId) -> bool {
        (**self).is_asserted(source)
    }
}

impl<T: Indicator + ?Sized> Indicator for &T {
    fn drive(&self, on: bool) {
        (**self).drive(on)
    }
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// A group of output pins driven together (status LED plus optional probe),
/// shareable between tasks on different executors.
pub struct SharedOutputs<M: RawMutex, P, const N: usize> {
    pins: Mutex<M, RefCell<Vec<P, N>>>,
}

impl<M: RawMutex, P: OutputPin, const N: usize> SharedOutputs<M, P, N> {
    pub const fn new() -> Self {
        Self {
            pins: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Add a pin to the group. A full group drops the pin and reports `name`.
    pub fn attach(&self, name: &'static str, pin: P) -> Result<()> {
        self.pins.lock(|pins| pins.borrow_mut().push(pin)).map_err(|_| {
            error!("Output group full, cannot attach {}", name);
            Error::OutputGroupFull(name)
        })
    }

    pub fn len(&self) -> usize {
        self.pins.lock(|pins| pins.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M: RawMutex, P: OutputPin, const N: usize> Default for SharedOutputs<M, P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, P: OutputPin, const N: usize> Indicator for SharedOutputs<M, P, N> {
    fn drive(&self, on: bool) {
        self.pins.lock(|pins| {
            for pin in pins.borrow_mut().iter_mut() {
                // Board pins are infallible
                let _ = pin.set_state(PinState::from(on));
            }
        })
    }
}
