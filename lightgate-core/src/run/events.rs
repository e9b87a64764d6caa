//! Gate edges and state transitions

use super::state::RunState;

/// Direction of a gate level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeKind {
    /// Pulse start: the object's leading edge broke the beam
    Rising,
    /// Pulse end: the beam is whole again
    Falling,
}

impl EdgeKind {
    /// Classify an edge from the pin level read right after it
    ///
    /// With `inverted` the gate output is active-low, so a low level
    /// starts the pulse.
    pub fn from_level(level_high: bool, inverted: bool) -> Self {
        if level_high != inverted {
            EdgeKind::Rising
        } else {
            EdgeKind::Falling
        }
    }
}

/// A timestamped gate level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    pub kind: EdgeKind,
    /// Capture time, ms since boot
    pub at_ms: u32,
}

impl EdgeEvent {
    pub const fn rising(at_ms: u32) -> Self {
        Self {
            kind: EdgeKind::Rising,
            at_ms,
        }
    }

    pub const fn falling(at_ms: u32) -> Self {
        Self {
            kind: EdgeKind::Falling,
            at_ms,
        }
    }
}

/// What happened to an edge handed to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeDisposition {
    /// Stored in the pending pair
    Recorded,
    /// Not running; dropped
    Ignored,
    /// Captured before the current run started; dropped
    Stale,
}

/// Input that caused a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Start frame from the remote link
    RemoteStart,
    /// Local reset/arm switch
    ResetInput,
}

/// A completed state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: RunState,
    pub to: RunState,
    pub trigger: Trigger,
    pub at_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_from_level() {
        assert_eq!(EdgeKind::from_level(true, false), EdgeKind::Rising);
        assert_eq!(EdgeKind::from_level(false, false), EdgeKind::Falling);
        assert_eq!(EdgeKind::from_level(false, true), EdgeKind::Rising);
        assert_eq!(EdgeKind::from_level(true, true), EdgeKind::Falling);
    }
}
