//! Rejection reasons for fixes that do not enter the track

use std::fmt;
use serde::{Serialize, Deserialize};

/// Why `ingest` refused a fix. Rejections never modify the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rejection {
    /// Accuracy radius above the configured gate (or unknown, when configured to reject that)
    LowAccuracy {
        accuracy_m: Option<f64>,
        threshold_m: f64,
    },
    /// Timestamp earlier than the last accepted fix
    OutOfOrder {
        timestamp: u64,
        last_timestamp: u64,
    },
    /// Structurally malformed fix
    InvalidFix {
        reason: InvalidFixReason,
    },
}

/// Structural problems detected before any gate is applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InvalidFixReason {
    NonFiniteCoordinate,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
    NegativeAccuracy,
    NanAccuracy,
}

/// Discriminant used for counters and compact reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    LowAccuracy,
    OutOfOrder,
    InvalidFix,
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::LowAccuracy { .. } => RejectionKind::LowAccuracy,
            Rejection::OutOfOrder { .. } => RejectionKind::OutOfOrder,
            Rejection::InvalidFix { .. } => RejectionKind::InvalidFix,
        }
    }
}

impl fmt::Display for InvalidFixReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidFixReason::NonFiniteCoordinate => "coordinate is not a finite number",
            InvalidFixReason::LatitudeOutOfRange => "latitude outside [-90, 90]",
            InvalidFixReason::LongitudeOutOfRange => "longitude outside [-180, 180]",
            InvalidFixReason::NegativeAccuracy => "accuracy radius is negative",
            InvalidFixReason::NanAccuracy => "accuracy radius is not a number",
        };
        f.write_str(text)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::LowAccuracy { accuracy_m: Some(accuracy_m), threshold_m } => {
                write!(f, "Low accuracy: {:.1} m exceeds {:.1} m gate", accuracy_m, threshold_m)
            }
            Rejection::LowAccuracy { accuracy_m: None, threshold_m } => {
                write!(f, "Low accuracy: unknown radius (gate {:.1} m)", threshold_m)
            }
            Rejection::OutOfOrder { timestamp, last_timestamp } => {
                write!(
                    f,
                    "Out of order: timestamp {} precedes last accepted {}",
                    timestamp, last_timestamp
                )
            }
            Rejection::InvalidFix { reason } => {
                write!(f, "Invalid fix: {}", reason)
            }
        }
    }
}

impl std::error::Error for Rejection {}
