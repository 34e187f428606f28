//! Track Odometer
//!
//! Streaming distance accumulation over noisy geolocation fixes. Each fix is
//! gated on accuracy, then contributes either `speed × elapsed` or a haversine
//! step that must clear a minimum-distance gate. The running total only ever
//! grows.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod source;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Fix, TrackPhase, EARTH_RADIUS_M};
pub use crate::algorithms::geodesy::haversine_distance;
pub use crate::processing::{
    TrackAccumulator, TrackState, Accepted, DistanceMethod, IngestResult, TrackSession,
    TrackUpdate, PumpReport,
};
pub use crate::validation::{Rejection, RejectionKind};
pub use crate::source::{
    FixSource, ReplayFixSource, AcquisitionOptions, SourceError, SourceResult, SourceStatus,
};
pub use crate::utils::{AccumulatorConfig, TrackerConfig, ConfigError};
pub use crate::api::{TrackSnapshot, OutputFormat, TextFormatter, JsonFormatter, CsvFormatter};
