//! Message carried by the remote start link

use serde::{Deserialize, Serialize};

use crate::frame::{Frame, FrameError};

/// Marker byte the start line sends to begin a run
pub const START_MARKER: u8 = b'S';

/// Errors decoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Framing failed
    Frame(FrameError),
    /// Payload is not a valid postcard message
    Decode,
}

impl From<FrameError> for MessageError {
    fn from(err: FrameError) -> Self {
        MessageError::Frame(err)
    }
}

impl From<postcard::Error> for MessageError {
    fn from(_: postcard::Error) -> Self {
        MessageError::Decode
    }
}

/// Start command from the remote start line
///
/// The payload is a single marker byte. Only the configured marker
/// starts a run; the receiver ignores anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartMessage {
    pub marker: u8,
}

impl Default for StartMessage {
    fn default() -> Self {
        Self::new(START_MARKER)
    }
}

impl StartMessage {
    pub const fn new(marker: u8) -> Self {
        Self { marker }
    }

    /// Whether this message carries `expected` as its marker
    pub fn is_start(&self, expected: u8) -> bool {
        self.marker == expected
    }

    /// Decode from a received frame
    ///
    /// Bytes after the message are ignored.
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        Ok(postcard::from_bytes(&frame.payload)?)
    }
}
