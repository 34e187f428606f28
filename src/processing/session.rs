//! Caller-side loop tying one fix source to one accumulator
//!
//! The session is the single writer for its accumulator: fixes are pulled from
//! the source and ingested strictly one after another, in arrival order.

use tracing::{info, warn};

use crate::api::types::TrackSnapshot;
use crate::processing::accumulator::{IngestResult, TrackAccumulator};
use crate::source::{AcquisitionOptions, FixSource, SourceError, SourceResult};

/// Delivered to a subscriber after every `ingest` performed by a pump
#[derive(Debug, Clone, PartialEq)]
pub struct TrackUpdate {
    pub outcome: IngestResult,
    pub total_distance_m: f64,
    pub path_len: usize,
}

/// Summary of one pump pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub polled: usize,
    pub accepted: usize,
    pub rejected: usize,
}

pub struct TrackSession<S: FixSource> {
    source: S,
    accumulator: TrackAccumulator,
    last_source_error: Option<SourceError>,
}

impl<S: FixSource> TrackSession<S> {
    pub fn new(source: S, accumulator: TrackAccumulator) -> Self {
        Self {
            source,
            accumulator,
            last_source_error: None,
        }
    }

    /// Begin a new track: clear the accumulator, then start the source.
    pub fn start(&mut self, options: &AcquisitionOptions) -> SourceResult<()> {
        self.accumulator.reset();
        self.last_source_error = None;

        match self.source.start(options) {
            Ok(()) => {
                info!(source = %self.source.status().name, "tracking started");
                Ok(())
            }
            Err(error) => Err(self.record_source_error(error)),
        }
    }

    /// Stop the source. The accumulated track stays readable.
    pub fn stop(&mut self) -> SourceResult<()> {
        self.source.stop()?;
        info!(
            total_m = self.accumulator.total_distance_m(),
            fixes = self.accumulator.path_len(),
            "tracking stopped"
        );
        Ok(())
    }

    pub fn restart(&mut self, options: &AcquisitionOptions) -> SourceResult<()> {
        self.stop()?;
        self.start(options)
    }

    /// Drain every pending fix into the accumulator
    pub fn pump(&mut self) -> SourceResult<PumpReport> {
        self.pump_with(|_| {})
    }

    /// Drain every pending fix, notifying `subscriber` after each ingest.
    ///
    /// A source failure ends the pass. Fixes ingested before it stay applied;
    /// the failure itself never touches the track.
    pub fn pump_with<F>(&mut self, mut subscriber: F) -> SourceResult<PumpReport>
    where
        F: FnMut(&TrackUpdate),
    {
        let mut report = PumpReport::default();

        loop {
            let fix = match self.source.poll_fix() {
                Ok(Some(fix)) => fix,
                Ok(None) => break,
                Err(error) => return Err(self.record_source_error(error)),
            };
            self.last_source_error = None;
            report.polled += 1;

            let outcome = self.accumulator.ingest(fix);
            if outcome.is_ok() {
                report.accepted += 1;
            } else {
                report.rejected += 1;
            }

            subscriber(&TrackUpdate {
                outcome,
                total_distance_m: self.accumulator.total_distance_m(),
                path_len: self.accumulator.path_len(),
            });
        }

        Ok(report)
    }

    /// Keep `error` for the snapshot. Transient errors only end the current pass.
    fn record_source_error(&mut self, error: SourceError) -> SourceError {
        if error.is_transient() {
            info!(%error, "fix source idle, poll again later");
        } else {
            warn!(%error, "fix source reported an error");
        }
        self.last_source_error = Some(error.clone());
        error
    }

    /// Accumulator snapshot with the latest source failure attached
    pub fn snapshot(&self) -> TrackSnapshot {
        let mut snapshot = self.accumulator.snapshot();
        snapshot.source_error = self.last_source_error.as_ref().map(|e| e.to_string());
        snapshot
    }

    pub fn accumulator(&self) -> &TrackAccumulator {
        &self.accumulator
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn last_source_error(&self) -> Option<&SourceError> {
        self.last_source_error.as_ref()
    }
}
