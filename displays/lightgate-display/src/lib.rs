//! Display components for the Lightgate timer
//!
//! This crate provides:
//! - `Screen`, a line-based screen buffer drawable on any
//!   `embedded_graphics` target
//! - `Renderer`, which turns a timer `View` into a `Screen`
//! - `Ssd1306`, an async I2C driver for 128x64 SSD1306 OLEDs
//!
//! The renderer runs in the controller's tick and only builds text. The
//! slow I2C transfer happens in the display task, off the timing path.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod error;
pub mod format;
pub mod renderer;
pub mod screen;
pub mod ssd1306;

// Re-export key types
pub use error::DisplayError;
pub use format::format_seconds;
pub use renderer::Renderer;
pub use screen::{Screen, TextLine, TextSize, LINE_LEN, MAX_LINES};
pub use ssd1306::{FrameBuffer, Ssd1306, DISPLAY_HEIGHT, DISPLAY_WIDTH};
