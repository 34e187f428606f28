//! Core types and constants for track distance accumulation

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
