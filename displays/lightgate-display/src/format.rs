//! Time formatting helpers

use core::fmt::Write;
use heapless::String;

/// Format milliseconds as seconds with three decimals
///
/// Integer arithmetic only: `1500` becomes `"1.500"`.
pub fn format_seconds(ms: u32) -> String<12> {
    let mut out = String::new();
    // u32::MAX ms is 11 characters, so this cannot overflow
    let _ = write!(out, "{}.{:03}", ms / 1000, ms % 1000);
    out
}
