//! Streaming track-distance accumulator
//!
//! Consumes one [`Fix`] at a time and grows a cumulative distance estimate that
//! is never revised downwards. Two signals compete for each step: the speed the
//! device reports and the positional delta between fixes. Reported speed wins
//! when it is clearly non-zero; otherwise the haversine step is used, subject to
//! a minimum-distance gate that swallows stationary jitter.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithms::geodesy::{distance_between, local_offset};
use crate::api::types::TrackSnapshot;
use crate::core::{Fix, TrackPhase};
use crate::utils::config::{AccumulatorConfig, ConfigError};
use crate::validation::{FixValidator, Rejection, RejectionKind};

/// Outcome of a single `ingest` call
pub type IngestResult = Result<Accepted, Rejection>;

/// How the distance contribution of an accepted fix was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMethod {
    /// First fix of the track; nothing to measure from
    First,
    /// Reported speed multiplied by elapsed time
    Speed,
    /// Haversine step at or above the minimum-distance gate
    Geometric,
    /// Haversine step below the gate; fix kept, distance discarded
    Jitter,
}

/// An accepted fix together with the totals after it was applied
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    pub fix: Fix,
    pub total_distance_m: f64,
    pub path_len: usize,
    /// Distance this fix added to the total (meters)
    pub added_m: f64,
    pub method: DistanceMethod,
}

/// Distance bookkeeping for the accepted path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackStats {
    pub speed_distance_m: f64,
    pub geometric_distance_m: f64,
    /// Geometric steps dropped by the minimum-distance gate
    pub jitter_discarded: u64,
}

/// Counts of refused fixes; kept apart from [`TrackState`] so rejections never touch it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts {
    pub low_accuracy: u64,
    pub out_of_order: u64,
    pub invalid: u64,
}

impl RejectionCounts {
    fn record(&mut self, kind: RejectionKind) {
        match kind {
            RejectionKind::LowAccuracy => self.low_accuracy += 1,
            RejectionKind::OutOfOrder => self.out_of_order += 1,
            RejectionKind::InvalidFix => self.invalid += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.low_accuracy + self.out_of_order + self.invalid
    }
}

/// Accumulated state of one track.
///
/// The last accepted fix is always the tail of `path`, so it is read from
/// there rather than stored twice.
#[derive(Debug, Clone, Default)]
pub struct TrackState {
    path: Vec<Fix>,
    total_distance_m: f64,
    stats: TrackStats,
}

impl TrackState {
    pub fn last_accepted(&self) -> Option<&Fix> {
        self.path.last()
    }

    pub fn path(&self) -> &[Fix] {
        &self.path
    }

    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    pub fn stats(&self) -> &TrackStats {
        &self.stats
    }

    pub fn phase(&self) -> TrackPhase {
        if self.path.is_empty() {
            TrackPhase::Empty
        } else {
            TrackPhase::Active
        }
    }
}

/// Stateful reducer over a fix stream. Not internally synchronised: callers
/// must serialise `ingest` calls on one instance.
#[derive(Debug, Clone)]
pub struct TrackAccumulator {
    config: AccumulatorConfig,
    validator: FixValidator,
    state: TrackState,
    rejections: RejectionCounts,
    last_rejection: Option<Rejection>,
}

impl Default for TrackAccumulator {
    fn default() -> Self {
        Self {
            config: AccumulatorConfig::default(),
            validator: FixValidator::new(),
            state: TrackState::default(),
            rejections: RejectionCounts::default(),
            last_rejection: None,
        }
    }
}

impl TrackAccumulator {
    /// Create an accumulator with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator with custom thresholds
    pub fn with_config(config: AccumulatorConfig) -> Result<Self, ConfigError> {
        config.ensure_valid()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Clear the track back to the empty state
    pub fn reset(&mut self) {
        self.state = TrackState::default();
        self.rejections = RejectionCounts::default();
        self.last_rejection = None;
    }

    /// Apply one fix. All-or-nothing: a rejected fix leaves the track untouched.
    pub fn ingest(&mut self, fix: Fix) -> IngestResult {
        let fix = match self.admit(fix) {
            Ok(fix) => fix,
            Err(rejection) => {
                debug!(timestamp = fix.timestamp, %rejection, "fix rejected");
                self.rejections.record(rejection.kind());
                self.last_rejection = Some(rejection.clone());
                return Err(rejection);
            }
        };

        let (added_m, method) = match self.state.last_accepted() {
            None => (0.0, DistanceMethod::First),
            Some(last) => self.step_distance(last, &fix),
        };

        match method {
            DistanceMethod::Speed => self.state.stats.speed_distance_m += added_m,
            DistanceMethod::Geometric => self.state.stats.geometric_distance_m += added_m,
            DistanceMethod::Jitter => self.state.stats.jitter_discarded += 1,
            DistanceMethod::First => {}
        }
        self.state.total_distance_m += added_m;
        self.state.path.push(fix);
        self.last_rejection = None;

        debug!(
            timestamp = fix.timestamp,
            ?method,
            added_m,
            total_m = self.state.total_distance_m,
            "fix accepted"
        );

        Ok(Accepted {
            fix,
            total_distance_m: self.state.total_distance_m,
            path_len: self.state.path.len(),
            added_m,
            method,
        })
    }

    /// Structural validation, accuracy gate, then ordering guard
    fn admit(&self, fix: Fix) -> Result<Fix, Rejection> {
        let fix = self.validator.validate(fix)?;

        let too_coarse = match fix.accuracy {
            Some(accuracy) => accuracy > self.config.max_accuracy_m,
            None => self.config.reject_unknown_accuracy,
        };
        if too_coarse {
            return Err(Rejection::LowAccuracy {
                accuracy_m: fix.accuracy,
                threshold_m: self.config.max_accuracy_m,
            });
        }

        if let Some(last) = self.state.last_accepted() {
            if fix.timestamp < last.timestamp {
                return Err(Rejection::OutOfOrder {
                    timestamp: fix.timestamp,
                    last_timestamp: last.timestamp,
                });
            }
        }

        Ok(fix)
    }

    fn step_distance(&self, last: &Fix, fix: &Fix) -> (f64, DistanceMethod) {
        match fix.speed {
            Some(speed) if speed > self.config.speed_threshold_mps => {
                let elapsed_s = fix.timestamp.saturating_sub(last.timestamp) as f64 / 1000.0;
                (speed * elapsed_s, DistanceMethod::Speed)
            }
            _ => {
                let distance = distance_between(last, fix, self.config.earth_radius_m);
                if distance >= self.config.min_distance_m {
                    (distance, DistanceMethod::Geometric)
                } else {
                    (0.0, DistanceMethod::Jitter)
                }
            }
        }
    }

    pub fn total_distance_m(&self) -> f64 {
        self.state.total_distance_m
    }

    pub fn path(&self) -> &[Fix] {
        self.state.path()
    }

    pub fn path_len(&self) -> usize {
        self.state.path.len()
    }

    pub fn last_accepted(&self) -> Option<&Fix> {
        self.state.last_accepted()
    }

    pub fn last_rejection(&self) -> Option<&Rejection> {
        self.last_rejection.as_ref()
    }

    pub fn phase(&self) -> TrackPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &TrackState {
        &self.state
    }

    pub fn rejections(&self) -> &RejectionCounts {
        &self.rejections
    }

    pub fn config(&self) -> &AccumulatorConfig {
        &self.config
    }

    /// Read-only view for a presentation layer
    pub fn snapshot(&self) -> TrackSnapshot {
        let path = self.state.path();
        let (elapsed_ms, net_displacement_m) = match (path.first(), path.last()) {
            (Some(first), Some(last)) => (
                last.timestamp - first.timestamp,
                local_offset(first, last, self.config.earth_radius_m).norm(),
            ),
            _ => (0, 0.0),
        };

        TrackSnapshot {
            phase: self.state.phase(),
            total_distance_m: self.state.total_distance_m,
            path_len: path.len(),
            last_fix: path.last().copied(),
            last_rejection: self.last_rejection.as_ref().map(|r| r.to_string()),
            source_error: None,
            stats: self.state.stats.clone(),
            rejections: self.rejections.clone(),
            elapsed_ms,
            net_displacement_m,
        }
    }
}
