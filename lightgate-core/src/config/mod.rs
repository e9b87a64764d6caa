//! Configuration types
//!
//! Board-agnostic device settings and the reader for the embedded
//! `lightgate.toml`.

pub mod parse;
pub mod types;

pub use parse::parse_config;
pub use types::*;
