//! Collaborator traits
//!
//! These traits define the interface between the timing logic and the
//! hardware-specific outputs.

pub mod presentation;

pub use presentation::{PresentationSink, SinkError, View};
