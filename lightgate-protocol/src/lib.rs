//! Remote Start Link Protocol
//!
//! The start line talks to the timer over a radio modem attached to a
//! UART. The modem delivers a raw byte stream, so every message is framed:
//! ```text
//! ┌──────┬─────┬───────────┬──────────┐
//! │ SYNC │ LEN │ PAYLOAD   │ CHECKSUM │
//! │ 1B   │ 1B  │ 1–16B     │ 1B       │
//! └──────┴─────┴───────────┴──────────┘
//! ```
//!
//! The payload is a postcard-encoded [`StartMessage`]. The link is one-way:
//! there is no acknowledgment and no retry.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_SYNC, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{MessageError, StartMessage, START_MARKER};
