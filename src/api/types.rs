//! Presentation-facing types

use crate::core::{Fix, TrackPhase};
use crate::processing::accumulator::{RejectionCounts, TrackStats};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Everything a presentation layer needs after an `ingest` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub phase: TrackPhase,
    /// Cumulative distance (meters)
    pub total_distance_m: f64,
    /// Number of accepted fixes
    pub path_len: usize,
    /// Most recently accepted fix
    pub last_fix: Option<Fix>,
    /// Reason the most recent fix was refused, if it was
    pub last_rejection: Option<String>,
    /// Message from the fix source when it could not deliver readings
    pub source_error: Option<String>,
    pub stats: TrackStats,
    pub rejections: RejectionCounts,
    /// Time spanned by the accepted path (milliseconds)
    pub elapsed_ms: u64,
    /// Straight-line distance from the first to the last accepted fix (meters)
    pub net_displacement_m: f64,
}

impl TrackSnapshot {
    /// Mean speed over the accepted path, if any time has elapsed (m/s)
    pub fn average_speed_mps(&self) -> Option<f64> {
        if self.elapsed_ms == 0 {
            None
        } else {
            Some(self.total_distance_m / (self.elapsed_ms as f64 / 1000.0))
        }
    }
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable multi-line text
    #[default]
    Text,
    /// JSON document
    Json,
    /// Header plus one CSV row
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}' (expected text, json or csv)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
