//! Core data types for track accumulation

use serde::{Deserialize, Serialize};

/// One geolocation reading as delivered by a fix source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Radius of the 68% confidence circle (meters), `None` when unknown
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Instantaneous ground speed (m/s), `None` when the source cannot report it
    #[serde(default)]
    pub speed: Option<f64>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64, timestamp: u64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            speed: None,
            timestamp,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy = Some(accuracy_m);
        self
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed = Some(speed_mps);
        self
    }
}

/// Logical state of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackPhase {
    /// No fix accepted yet
    Empty,
    /// At least one fix accepted
    Active,
}
