//! Inter-task communication primitives
//!
//! This module defines the Embassy channels and signals shared between
//! producers, the consumer, the edge watcher and the handler tasks. All of
//! them use `CriticalSectionRawMutex` because writers run on interrupt
//! executors.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::config::QUEUE_CAPACITY;
use crate::debounce::DebounceClock;
use crate::types::{Event, SourceId};

/// Single-permit notification. Signaling an already signaled instance
/// coalesces; the waiter wakes once.
pub type BinarySignal = Signal<CriticalSectionRawMutex, ()>;

/// Bounded FIFO of events from all producers to the consumer
pub type EventQueue<const N: usize> = Channel<CriticalSectionRawMutex, Event, N>;

/// Per-source signals plus the combined-press signal
pub struct SourceSignals {
    sources: [BinarySignal; 2],
    combined: BinarySignal,
}

impl SourceSignals {
    pub const fn new() -> Self {
        Self {
            sources: [Signal::new(), Signal::new()],
            combined: Signal::new(),
        }
    }

    /// Signal owned by one input; the edge watcher is its only signaler
    pub fn source(&self, source: SourceId) -> &BinarySignal {
        &self.sources[source.index()]
    }

    /// Signal raised by a source handler that saw both inputs held
    pub fn combined(&self) -> &BinarySignal {
        &self.combined
    }
}

impl Default for SourceSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer -> consumer event queue
/// Buffer size: 20 (producers must never outpace the consumer by more)
pub static EVENT_QUEUE: EventQueue<QUEUE_CAPACITY> = Channel::new();

/// Edge watcher -> handler task signals
pub static SOURCE_SIGNALS: SourceSignals = SourceSignals::new();

/// Timestamp of the last accepted edge, shared by the edge watcher and the
/// idle reminder
pub static DEBOUNCE_CLOCK: DebounceClock = DebounceClock::new();
