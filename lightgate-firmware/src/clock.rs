//! Millisecond timestamps for the timing core

use embassy_time::Instant;

/// Milliseconds since boot, truncated to the low 32 bits
///
/// The value wraps after about 49.7 days. The run machine measures every
/// span with wrapping arithmetic, so a run may straddle the wrap.
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
