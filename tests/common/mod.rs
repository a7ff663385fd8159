//! Virtual-time fakes for the board collaborators

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ops::Range;

use embedded_hal_async::delay::DelayNs;
use pico_coord::io::{Indicator, InputLevels, Monotonic};
use pico_coord::types::SourceId;

/// Shared virtual clock; only fake delays move it forward
#[derive(Default)]
pub struct VirtualClock {
    now_ns: Cell<u64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_ms(ms: u64) -> Self {
        let clock = Self::new();
        clock.set_ms(ms);
        clock
    }

    pub fn now(&self) -> u64 {
        self.now_ns.get() / 1_000_000
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_ns.set(ms * 1_000_000);
    }

    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get() + ns);
    }

    pub fn delay(&self) -> VirtualDelay<'_> {
        VirtualDelay { clock: self }
    }
}

impl Monotonic for VirtualClock {
    fn now_ms(&self) -> u32 {
        self.now() as u32
    }
}

/// Completes immediately after advancing the virtual clock
pub struct VirtualDelay<'a> {
    clock: &'a VirtualClock,
}

impl DelayNs for VirtualDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(ns as u64);
    }

    async fn delay_us(&mut self, us: u32) {
        self.clock.advance_ns(us as u64 * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ns(ms as u64 * 1_000_000);
    }
}

/// Button levels as a function of virtual time
pub struct ScriptedButtons<'a> {
    clock: &'a VirtualClock,
    held: [Vec<Range<u64>>; 2],
}

impl<'a> ScriptedButtons<'a> {
    pub fn new(clock: &'a VirtualClock) -> Self {
        Self {
            clock,
            held: [Vec::new(), Vec::new()],
        }
    }

    /// Hold `source` down over `ms` (half-open, in virtual milliseconds)
    pub fn hold(mut self, source: SourceId, ms: Range<u64>) -> Self {
        self.held[source.index()].push(ms);
        self
    }
}

impl InputLevels for ScriptedButtons<'_> {
    fn is_asserted(&self, source: SourceId) -> bool {
        let now = self.clock.now();
        self.held[source.index()].iter().any(|range| range.contains(&now))
    }
}

/// Records every output change with its virtual timestamp
pub struct RecordingLed<'a> {
    clock: &'a VirtualClock,
    log: RefCell<Vec<(u64, bool)>>,
}

impl<'a> RecordingLed<'a> {
    pub fn new(clock: &'a VirtualClock) -> Self {
        Self {
            clock,
            log: RefCell::new(Vec::new()),
        }
    }

    pub fn log(&self) -> Vec<(u64, bool)> {
        self.log.borrow().clone()
    }

    pub fn count(&self, on: bool) -> usize {
        self.log.borrow().iter().filter(|(_, level)| *level == on).count()
    }

    pub fn is_untouched(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

impl Indicator for RecordingLed<'_> {
    fn drive(&self, on: bool) {
        self.log.borrow_mut().push((self.clock.now(), on));
    }
}
