//! Configuration loading and validation

pub mod config;

pub use config::{AccumulatorConfig, TrackerConfig, ConfigError, ValidationResult};
