//! Pending edge capture and pulse-width validation

use super::events::{EdgeEvent, EdgeKind};

/// Most recent rising and falling timestamps since the last resolution
///
/// Each field is last-write-wins. A rising edge opens a new pulse, so it
/// discards any falling edge still held from before it. A pair is only
/// evaluated once both are present, and taking the pair always clears both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingEdge {
    rising_ms: Option<u32>,
    falling_ms: Option<u32>,
}

impl PendingEdge {
    pub const fn new() -> Self {
        Self {
            rising_ms: None,
            falling_ms: None,
        }
    }

    /// Store an edge timestamp, overwriting any earlier one of the same kind
    ///
    /// A falling edge with no rising edge before it cannot close this pulse
    /// and is dropped when the next rising edge arrives.
    pub fn record(&mut self, edge: EdgeEvent) {
        match edge.kind {
            EdgeKind::Rising => {
                self.rising_ms = Some(edge.at_ms);
                self.falling_ms = None;
            }
            EdgeKind::Falling => self.falling_ms = Some(edge.at_ms),
        }
    }

    pub fn rising_ms(&self) -> Option<u32> {
        self.rising_ms
    }

    pub fn falling_ms(&self) -> Option<u32> {
        self.falling_ms
    }

    /// Both timestamps are present
    pub fn is_complete(&self) -> bool {
        self.rising_ms.is_some() && self.falling_ms.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.rising_ms.is_none() && self.falling_ms.is_none()
    }

    /// Take `(rising, falling)` if both are set, clearing the capture
    ///
    /// A half-filled capture is left untouched.
    pub fn take_pair(&mut self) -> Option<(u32, u32)> {
        match (self.rising_ms, self.falling_ms) {
            (Some(rising), Some(falling)) => {
                self.clear();
                Some((rising, falling))
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.rising_ms = None;
        self.falling_ms = None;
    }
}

/// Result of checking one rising/falling pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseVerdict {
    /// Wide enough to be a real crossing
    Valid { width_ms: u32 },
    /// Noise or a partial occlusion
    TooShort { width_ms: u32 },
    /// Falling edge came before the rising edge
    OutOfOrder,
}

/// Classify a pulse by width
///
/// A pulse is valid only when it is strictly wider than `min_trigger_ms`.
/// Timestamps are compared across the 32-bit clock wrap.
pub fn classify(rising_ms: u32, falling_ms: u32, min_trigger_ms: u32) -> PulseVerdict {
    match span_ms(rising_ms, falling_ms) {
        None => PulseVerdict::OutOfOrder,
        Some(width_ms) if width_ms > min_trigger_ms => PulseVerdict::Valid { width_ms },
        Some(width_ms) => PulseVerdict::TooShort { width_ms },
    }
}

/// Milliseconds from `earlier_ms` to `later_ms` on the wrapping clock
///
/// `None` when `later_ms` is actually before `earlier_ms`, i.e. the
/// wrapping distance is more than half the clock range.
pub fn span_ms(earlier_ms: u32, later_ms: u32) -> Option<u32> {
    let span = later_ms.wrapping_sub(earlier_ms);
    (span <= i32::MAX as u32).then_some(span)
}
