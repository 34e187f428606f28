//! Configuration loading, validation and runtime adjustment
//!
//! Accumulator thresholds and acquisition options live in one JSON file; the
//! setters re-validate so a running tracker never holds an out-of-range gate.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::api::types::OutputFormat;
use crate::core::{
    DEFAULT_MAX_ACCURACY_M, DEFAULT_MIN_DISTANCE_M, DEFAULT_SPEED_THRESHOLD_MPS, EARTH_RADIUS_M,
};
use crate::source::AcquisitionOptions;

/// Thresholds driving the accumulation policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulatorConfig {
    /// Fixes with a known accuracy radius above this are rejected (meters)
    pub max_accuracy_m: f64,
    /// Geometric steps below this are not added to the total (meters)
    pub min_distance_m: f64,
    /// Reported speed must exceed this to use the speed branch (m/s)
    pub speed_threshold_mps: f64,
    /// Sphere radius for the haversine formula (meters)
    pub earth_radius_m: f64,
    /// Treat fixes without an accuracy radius as failing the accuracy gate
    pub reject_unknown_accuracy: bool,
}

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub accumulator: AccumulatorConfig,
    pub acquisition: AcquisitionOptions,
    pub output_format: OutputFormat,
    /// Enable debug logging
    pub debug_logging: bool,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn into_result(self) -> Result<(), ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            max_accuracy_m: DEFAULT_MAX_ACCURACY_M,
            min_distance_m: DEFAULT_MIN_DISTANCE_M,
            speed_threshold_mps: DEFAULT_SPEED_THRESHOLD_MPS,
            earth_radius_m: EARTH_RADIUS_M,
            reject_unknown_accuracy: false,
        }
    }
}

impl AccumulatorConfig {
    /// Check every threshold, collecting all problems rather than stopping at the first
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !self.max_accuracy_m.is_finite() || self.max_accuracy_m <= 0.0 {
            result.errors.push(invalid(
                "max_accuracy_m",
                self.max_accuracy_m,
                "Accuracy gate must be a positive number of meters",
            ));
        } else if self.max_accuracy_m > 100.0 {
            result.warnings.push(format!(
                "max_accuracy_m = {} admits very coarse fixes; distance will be noisy",
                self.max_accuracy_m
            ));
        }

        if !self.min_distance_m.is_finite() || self.min_distance_m < 0.0 {
            result.errors.push(invalid(
                "min_distance_m",
                self.min_distance_m,
                "Minimum distance gate must be zero or positive",
            ));
        } else if self.min_distance_m == 0.0 {
            result
                .warnings
                .push("min_distance_m = 0 disables jitter suppression".to_string());
        }

        if !self.speed_threshold_mps.is_finite() || self.speed_threshold_mps < 0.0 {
            result.errors.push(invalid(
                "speed_threshold_mps",
                self.speed_threshold_mps,
                "Speed threshold must be zero or positive",
            ));
        }

        if !self.earth_radius_m.is_finite() || self.earth_radius_m <= 0.0 {
            result.errors.push(invalid(
                "earth_radius_m",
                self.earth_radius_m,
                "Sphere radius must be positive",
            ));
        }

        result.is_valid = result.errors.is_empty();
        result
    }

    /// Update the accuracy gate, returning the previous value
    pub fn set_max_accuracy(&mut self, threshold_m: f64) -> Result<f64, ConfigError> {
        let mut candidate = self.clone();
        candidate.max_accuracy_m = threshold_m;
        candidate.validate().into_result()?;
        Ok(std::mem::replace(&mut self.max_accuracy_m, threshold_m))
    }

    /// Update the minimum-distance gate, returning the previous value
    pub fn set_min_distance(&mut self, distance_m: f64) -> Result<f64, ConfigError> {
        let mut candidate = self.clone();
        candidate.min_distance_m = distance_m;
        candidate.validate().into_result()?;
        Ok(std::mem::replace(&mut self.min_distance_m, distance_m))
    }

    /// Update the speed-branch threshold, returning the previous value
    pub fn set_speed_threshold(&mut self, speed_mps: f64) -> Result<f64, ConfigError> {
        let mut candidate = self.clone();
        candidate.speed_threshold_mps = speed_mps;
        candidate.validate().into_result()?;
        Ok(std::mem::replace(&mut self.speed_threshold_mps, speed_mps))
    }

    pub(crate) fn ensure_valid(&self) -> Result<(), ConfigError> {
        self.validate().into_result()
    }
}

impl TrackerConfig {
    /// Load configuration from a JSON file; missing sections fall back to defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: TrackerConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate().into_result()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = self.accumulator.validate();

        if self.acquisition.timeout_ms == 0 {
            result.errors.push(invalid(
                "acquisition.timeout_ms",
                0,
                "Acquisition timeout must be positive",
            ));
        }
        if !self.acquisition.high_accuracy {
            result.warnings.push(
                "acquisition.high_accuracy is off; most fixes may fail the accuracy gate"
                    .to_string(),
            );
        }
        if self.acquisition.maximum_age_ms > 0 {
            result.warnings.push(format!(
                "acquisition.maximum_age_ms = {} allows cached fixes",
                self.acquisition.maximum_age_ms
            ));
        }

        result.is_valid = result.errors.is_empty();
        result
    }
}

fn invalid<V: ToString>(parameter: &str, value: V, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_accumulator_config() {
        let config = AccumulatorConfig::default();
        assert_eq!(config.max_accuracy_m, 20.0);
        assert_eq!(config.min_distance_m, 5.0);
        assert_eq!(config.speed_threshold_mps, 0.5);
        assert_eq!(config.earth_radius_m, 6_371_000.0);
        assert!(!config.reject_unknown_accuracy);

        let validation = config.validate();
        assert!(validation.is_valid);
        assert!(validation.warnings.is_empty());
    }

    #[test]
    fn test_invalid_thresholds_are_all_reported() {
        let config = AccumulatorConfig {
            max_accuracy_m: 0.0,
            min_distance_m: -1.0,
            speed_threshold_mps: f64::NAN,
            earth_radius_m: -6_371_000.0,
            reject_unknown_accuracy: false,
        };

        let validation = config.validate();
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 4);
    }

    #[test]
    fn test_zero_min_distance_warns() {
        let config = AccumulatorConfig { min_distance_m: 0.0, ..Default::default() };
        let validation = config.validate();
        assert!(validation.is_valid);
        assert_eq!(validation.warnings.len(), 1);
    }

    #[test]
    fn test_runtime_accuracy_adjustment() {
        let mut config = AccumulatorConfig::default();

        let old = config.set_max_accuracy(15.0).unwrap();
        assert_eq!(old, 20.0);
        assert_eq!(config.max_accuracy_m, 15.0);

        assert!(config.set_max_accuracy(-2.0).is_err());
        assert_eq!(config.max_accuracy_m, 15.0); // Should remain unchanged
    }

    #[test]
    fn test_runtime_gate_adjustments() {
        let mut config = AccumulatorConfig::default();

        assert_eq!(config.set_min_distance(3.0).unwrap(), 5.0);
        assert!(config.set_min_distance(f64::INFINITY).is_err());
        assert_eq!(config.min_distance_m, 3.0);

        assert_eq!(config.set_speed_threshold(1.0).unwrap(), 0.5);
        assert!(config.set_speed_threshold(-0.1).is_err());
        assert_eq!(config.speed_threshold_mps, 1.0);
    }

    #[test]
    fn test_config_file_round_trip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("tracker.json");

        let mut config = TrackerConfig::default();
        config.accumulator.min_distance_m = 7.5;
        config.output_format = OutputFormat::Json;
        config.debug_logging = true;
        config.save_to_file(&path).unwrap();

        let loaded = TrackerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.accumulator, config.accumulator);
        assert_eq!(loaded.output_format, OutputFormat::Json);
        assert!(loaded.debug_logging);
        assert_eq!(loaded.acquisition.timeout_ms, config.acquisition.timeout_ms);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("partial.json");
        fs::write(&path, r#"{ "accumulator": { "max_accuracy_m": 30.0 } }"#).unwrap();

        let loaded = TrackerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.accumulator.max_accuracy_m, 30.0);
        assert_eq!(loaded.accumulator.min_distance_m, 5.0);
        assert_eq!(loaded.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_invalid_config_file_is_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, r#"{ "accumulator": { "earth_radius_m": 0.0 } }"#).unwrap();

        match TrackerConfig::from_file(&path) {
            Err(ConfigError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, "earth_radius_m")
            }
            other => panic!("expected invalid parameter, got {:?}", other),
        }

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            TrackerConfig::from_file(&path),
            Err(ConfigError::SerializationError { .. })
        ));

        assert!(matches!(
            TrackerConfig::from_file(tmp.path().join("missing.json")),
            Err(ConfigError::IoError { .. })
        ));
    }

    #[test]
    fn test_zero_acquisition_timeout_is_invalid() {
        let mut config = TrackerConfig::default();
        config.acquisition.timeout_ms = 0;
        assert!(!config.validate().is_valid);
    }
}
