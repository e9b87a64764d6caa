//! Board-agnostic timing core for the photogate race timer
//!
//! This crate contains all timing logic that does not depend on
//! specific hardware implementations:
//!
//! - Run state machine (Ready / Running / ShowingResults)
//! - Pulse capture and noise rejection
//! - Bounded split-time log
//! - Presentation trait for the display collaborator
//! - Configuration types and the embedded config parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod run;
pub mod traits;
