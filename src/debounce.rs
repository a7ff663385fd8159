//! Debounce filter: raw falling edges in, rate-limited source signals out
//!
//! Runs in interrupt context, so nothing here blocks. The only state it
//! mutates is the [`DebounceClock`], a single atomic word read and written
//! whole, so readers never see a half-published timestamp.
//!
//! The guard window is global across both inputs: an edge on SW2 that lands
//! within the window after an accepted SW1 edge is dropped as well.

use portable_atomic::{AtomicU64, Ordering};

use crate::channels::SourceSignals;
use crate::types::{EdgeVerdict, SourceId};

/// Set above the 32-bit timestamp once an edge has been accepted
const PRIMED: u64 = 1 << 32;

/// Timestamp of the most recently accepted edge from any source.
///
/// Zero means no edge yet; otherwise the low 32 bits hold the timestamp.
pub struct DebounceClock {
    last_accepted: AtomicU64,
}

impl DebounceClock {
    pub const fn new() -> Self {
        Self {
            last_accepted: AtomicU64::new(0),
        }
    }

    /// `None` until the first edge has been accepted
    pub fn last_accepted(&self) -> Option<u32> {
        let word = self.last_accepted.load(Ordering::Acquire);
        (word & PRIMED != 0).then_some(word as u32)
    }

    /// Milliseconds since the last accepted edge, tolerant of clock wrap
    pub fn elapsed_since(&self, now_ms: u32) -> Option<u32> {
        self.last_accepted().map(|last| now_ms.wrapping_sub(last))
    }

    /// Record `now_ms` as the last accepted edge
    pub fn mark(&self, now_ms: u32) {
        self.last_accepted.store(PRIMED | now_ms as u64, Ordering::Release);
    }
}

impl Default for DebounceClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-to-signal bridge
pub struct DebounceFilter<'a> {
    guard_ms: u32,
    clock: &'a DebounceClock,
    signals: &'a SourceSignals,
}

impl<'a> DebounceFilter<'a> {
    pub const fn new(guard_ms: u32, clock: &'a DebounceClock, signals: &'a SourceSignals) -> Self {
        Self {
            guard_ms,
            clock,
            signals,
        }
    }

    /// Feed one falling edge observed on `source` at `now_ms`.
    ///
    /// An edge less than the guard window after the last accepted one is
    /// dropped without touching the clock. Otherwise the source's signal is
    /// raised and the clock moves to `now_ms`.
    pub fn on_edge(&self, source: SourceId, now_ms: u32) -> EdgeVerdict {
        if let Some(elapsed) = self.clock.elapsed_since(now_ms) {
            if elapsed < self.guard_ms {
                trace!("{} edge suppressed ({} ms after last)", source.name(), elapsed);
                return EdgeVerdict::Suppressed;
            }
        }

        self.signals.source(source).signal(());
        self.clock.mark(now_ms);
        debug!("{} edge accepted at {} ms", source.name(), now_ms);
        EdgeVerdict::Accepted
    }
}
