//! Replay source for recorded fixes, used by the CLI and in tests

use crate::core::Fix;
use crate::source::{AcquisitionOptions, FixSource, SourceError, SourceResult, SourceStatus};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// On-disk layout of a recorded fix log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixLog {
    pub fixes: Vec<Fix>,
}

#[derive(Debug, Clone, PartialEq)]
enum Availability {
    Available,
    Unavailable(String),
    PermissionDenied,
    /// Started fine, but no reading arrives within the timeout
    Stalled,
}

/// Delivers a queue of recorded fixes in order
pub struct ReplayFixSource {
    status: SourceStatus,
    queue: VecDeque<Fix>,
    availability: Availability,
}

impl ReplayFixSource {
    pub fn new(fixes: Vec<Fix>) -> Self {
        let mut status = SourceStatus::new("replay");
        status.pending = fixes.len();

        Self {
            status,
            queue: fixes.into(),
            availability: Availability::Available,
        }
    }

    /// Parse a fix log from a JSON string
    pub fn from_json(json: &str) -> SourceResult<Self> {
        let log: FixLog = serde_json::from_str(json).map_err(|e| SourceError::LogRead {
            message: format!("Failed to parse fix log: {}", e),
        })?;
        Ok(Self::new(log.fixes))
    }

    /// Load a fix log from a JSON file
    pub fn from_log_file<P: AsRef<Path>>(path: P) -> SourceResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| SourceError::LogRead {
            message: format!("Failed to read fix log '{}': {}", path_str, e),
        })?;

        let source = Self::from_json(&content)?;
        info!(path = %path_str, fixes = source.queue.len(), "loaded fix log");
        Ok(source)
    }

    /// Append a fix to the end of the queue
    pub fn push_fix(&mut self, fix: Fix) {
        self.queue.push_back(fix);
        self.status.pending = self.queue.len();
    }

    /// Simulate the platform losing its positioning capability
    pub fn set_unavailable(&mut self, reason: &str) {
        self.availability = Availability::Unavailable(reason.to_string());
    }

    /// Simulate the user refusing location access
    pub fn deny_permission(&mut self) {
        self.availability = Availability::PermissionDenied;
    }

    /// Simulate a source that stays up but stops producing readings
    pub fn stall(&mut self) {
        self.availability = Availability::Stalled;
    }

    /// Undo a simulated failure
    pub fn restore(&mut self) {
        self.availability = Availability::Available;
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn check_available(&mut self) -> SourceResult<()> {
        let error = match &self.availability {
            Availability::Available | Availability::Stalled => return Ok(()),
            Availability::Unavailable(reason) => {
                SourceError::Unavailable { reason: reason.clone() }
            }
            Availability::PermissionDenied => SourceError::PermissionDenied,
        };
        self.fail(error)
    }

    fn check_stalled(&mut self) -> SourceResult<()> {
        if self.availability != Availability::Stalled {
            return Ok(());
        }
        let timeout_ms = self
            .status
            .options
            .as_ref()
            .map_or_else(|| AcquisitionOptions::default().timeout_ms, |o| o.timeout_ms);
        self.fail(SourceError::Timeout { timeout_ms })
    }

    fn fail(&mut self, error: SourceError) -> SourceResult<()> {
        self.status.error_count += 1;
        warn!(source = %self.status.name, %error, "fix source failure");
        Err(error)
    }
}

impl FixSource for ReplayFixSource {
    fn start(&mut self, options: &AcquisitionOptions) -> SourceResult<()> {
        options.check()?;
        self.check_available()?;

        self.status.active = true;
        self.status.error_count = 0;
        self.status.options = Some(options.clone());
        Ok(())
    }

    fn stop(&mut self) -> SourceResult<()> {
        self.status.active = false;
        Ok(())
    }

    fn poll_fix(&mut self) -> SourceResult<Option<Fix>> {
        if !self.status.active {
            return Err(SourceError::NotStarted);
        }
        self.check_available()?;
        self.check_stalled()?;

        let fix = self.queue.pop_front();
        if let Some(fix) = &fix {
            self.status.fixes_delivered += 1;
            self.status.last_fix_time = Some(fix.timestamp);
        }
        self.status.pending = self.queue.len();
        Ok(fix)
    }

    fn status(&self) -> SourceStatus {
        self.status.clone()
    }

    fn is_active(&self) -> bool {
        self.status.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fixes() -> Vec<Fix> {
        vec![
            Fix::new(10.0, 20.0, 0).with_accuracy(3.0),
            Fix::new(10.0001, 20.0, 1000).with_accuracy(3.0).with_speed(1.5),
        ]
    }

    #[test]
    fn test_replay_delivers_in_order() {
        let mut source = ReplayFixSource::new(fixes());
        source.start(&AcquisitionOptions::default()).unwrap();

        assert_eq!(source.poll_fix().unwrap().map(|f| f.timestamp), Some(0));
        assert_eq!(source.poll_fix().unwrap().map(|f| f.timestamp), Some(1000));
        assert_eq!(source.poll_fix().unwrap(), None);

        let status = source.status();
        assert_eq!(status.fixes_delivered, 2);
        assert_eq!(status.pending, 0);
        assert_eq!(status.last_fix_time, Some(1000));
    }

    #[test]
    fn test_poll_before_start_fails() {
        let mut source = ReplayFixSource::new(fixes());
        assert_eq!(source.poll_fix(), Err(SourceError::NotStarted));

        source.start(&AcquisitionOptions::default()).unwrap();
        source.stop().unwrap();
        assert!(!source.is_active());
        assert_eq!(source.poll_fix(), Err(SourceError::NotStarted));
    }

    #[test]
    fn test_unavailable_source() {
        let mut source = ReplayFixSource::new(fixes());
        source.set_unavailable("no GNSS hardware");

        let err = source.start(&AcquisitionOptions::default()).unwrap_err();
        assert_eq!(err, SourceError::Unavailable { reason: "no GNSS hardware".to_string() });
        assert!(!source.is_active());
        assert_eq!(source.status().error_count, 1);

        source.restore();
        source.start(&AcquisitionOptions::default()).unwrap();
        assert!(source.status().is_healthy());
    }

    #[test]
    fn test_permission_denied_mid_stream() {
        let mut source = ReplayFixSource::new(fixes());
        source.start(&AcquisitionOptions::default()).unwrap();
        source.poll_fix().unwrap();

        source.deny_permission();
        assert_eq!(source.poll_fix(), Err(SourceError::PermissionDenied));
        assert_eq!(source.pending(), 1);
    }

    #[test]
    fn test_stalled_source_times_out() {
        let mut source = ReplayFixSource::new(fixes());
        source.stall();

        let options = AcquisitionOptions { timeout_ms: 2500, ..Default::default() };
        source.start(&options).unwrap();

        let err = source.poll_fix().unwrap_err();
        assert_eq!(err, SourceError::Timeout { timeout_ms: 2500 });
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "No location fix within 2500ms");
        assert_eq!(source.pending(), 2);
        assert_eq!(source.status().error_count, 1);

        source.restore();
        assert_eq!(source.poll_fix().unwrap().map(|f| f.timestamp), Some(0));
    }

    #[test]
    fn test_invalid_options() {
        let mut source = ReplayFixSource::new(fixes());
        let options = AcquisitionOptions { timeout_ms: 0, ..Default::default() };
        assert!(matches!(source.start(&options), Err(SourceError::InvalidOptions { .. })));
    }

    #[test]
    fn test_log_file_loading() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("fixes.json");
        fs::write(
            &path,
            r#"{"fixes": [
                {"latitude": 1.0, "longitude": 2.0, "accuracy": 4.5,
                 "speed": null, "timestamp": 100},
                {"latitude": 1.0, "longitude": 2.0001, "timestamp": 200}
            ]}"#,
        )
        .unwrap();

        let mut source = ReplayFixSource::from_log_file(&path).unwrap();
        assert_eq!(source.pending(), 2);
        source.start(&AcquisitionOptions::default()).unwrap();

        let first = source.poll_fix().unwrap().unwrap();
        assert_eq!(first.accuracy, Some(4.5));
        assert_eq!(first.speed, None);
        let second = source.poll_fix().unwrap().unwrap();
        assert_eq!(second.accuracy, None);
    }

    #[test]
    fn test_bad_log_file() {
        let tmp = tempdir().unwrap();
        assert!(matches!(
            ReplayFixSource::from_log_file(tmp.path().join("absent.json")),
            Err(SourceError::LogRead { .. })
        ));
        assert!(matches!(
            ReplayFixSource::from_json("{\"fixes\": 3}"),
            Err(SourceError::LogRead { .. })
        ));
    }
}
