//! Common types shared by the queue pipeline and the button signaling path

/// One of the two physical button inputs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceId {
    Sw1,
    Sw2,
}

impl SourceId {
    pub const ALL: [SourceId; 2] = [SourceId::Sw1, SourceId::Sw2];

    /// The input that is not `self`
    pub const fn other(self) -> SourceId {
        match self {
            SourceId::Sw1 => SourceId::Sw2,
            SourceId::Sw2 => SourceId::Sw1,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            SourceId::Sw1 => 0,
            SourceId::Sw2 => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SourceId::Sw1 => "SW1",
            SourceId::Sw2 => "SW2",
        }
    }
}

/// Event carried through the bounded queue: the posting producer's identifier.
///
/// Immutable once sent and consumed exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event(pub u32);

impl Event {
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Result of feeding one raw edge through the debounce filter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeVerdict {
    /// The edge was turned into a signal for its source
    Accepted,
    /// The edge fell inside the guard window and was dropped
    Suppressed,
}

/// How a single-source press ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressOutcome {
    /// The other input was held too; the press was handed to the combined handler
    Redirected,
    /// The source-specific pattern ran to completion
    Completed,
}

/// Crate version, reported in the startup banner
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
