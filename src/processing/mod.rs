//! Fix stream processing

pub mod accumulator;
pub mod session;

pub use accumulator::{
    Accepted, DistanceMethod, IngestResult, RejectionCounts, TrackAccumulator, TrackState,
    TrackStats,
};
pub use session::{TrackSession, TrackUpdate, PumpReport};
