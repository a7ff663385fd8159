//! Error types for the coordination core

use core::fmt;

use crate::types::Event;

/// Coordination errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A non-blocking send found the event queue full; the system is undersized
    QueueFull(Event),
    /// A task could not be spawned at startup
    TaskSpawn(&'static str),
    /// More outputs were attached than the shared group holds
    OutputGroupFull(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull(event) => write!(f, "event queue full, dropped event {}", event.id()),
            Self::TaskSpawn(name) => write!(f, "failed to spawn task {}", name),
            Self::OutputGroupFull(name) => write!(f, "no room for output {}", name),
        }
    }
}

/// Result type for coordination operations
pub type Result<T> = core::result::Result<T, Error>;
