//! Fix acquisition boundary
//!
//! The accumulator never acquires fixes itself. Anything that can produce
//! them (a platform positioning API, a GNSS receiver, a recorded log) sits
//! behind [`FixSource`].

pub mod error;
pub mod replay;

pub use error::{SourceError, SourceResult};
pub use replay::{ReplayFixSource, FixLog};

use crate::core::Fix;
use serde::{Deserialize, Serialize};

/// Capability to start, stop and poll a stream of fixes
pub trait FixSource {
    /// Begin acquisition with the given options
    fn start(&mut self, options: &AcquisitionOptions) -> SourceResult<()>;

    /// Stop acquisition. Stopping an inactive source is not an error.
    fn stop(&mut self) -> SourceResult<()>;

    /// Returns Ok(Some(fix)) if a fix is pending
    /// Returns Ok(None) if nothing is pending right now
    /// Returns Err(error) if the source cannot deliver readings
    fn poll_fix(&mut self) -> SourceResult<Option<Fix>>;

    fn status(&self) -> SourceStatus;

    fn is_active(&self) -> bool;
}

/// Acquisition request parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionOptions {
    /// Ask for the most accurate positioning mode available
    pub high_accuracy: bool,
    /// Oldest cached reading the source may return (milliseconds, 0 = never cached)
    pub maximum_age_ms: u64,
    /// Give up on a single reading after this long (milliseconds)
    pub timeout_ms: u32,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age_ms: 0,
            timeout_ms: 10_000,
        }
    }
}

impl AcquisitionOptions {
    pub fn check(&self) -> SourceResult<()> {
        if self.timeout_ms == 0 {
            return Err(SourceError::InvalidOptions {
                reason: "timeout_ms must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Fix source status information
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStatus {
    pub name: String,
    pub active: bool,
    pub fixes_delivered: u64,
    pub pending: usize,
    pub last_fix_time: Option<u64>,
    pub error_count: u32,
    pub options: Option<AcquisitionOptions>,
}

impl SourceStatus {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active: false,
            fixes_delivered: 0,
            pending: 0,
            last_fix_time: None,
            error_count: 0,
            options: None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.active && self.error_count == 0
    }
}
