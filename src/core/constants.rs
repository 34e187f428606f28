//! Physical constants and default filter thresholds

/// Mean Earth radius used by the haversine formula (meters)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Fixes with a known accuracy radius above this are discarded (meters)
pub const DEFAULT_MAX_ACCURACY_M: f64 = 20.0;

/// Geometric steps shorter than this are treated as stationary jitter (meters)
pub const DEFAULT_MIN_DISTANCE_M: f64 = 5.0;

/// Reported speeds above this select the speed-based distance branch (m/s)
pub const DEFAULT_SPEED_THRESHOLD_MPS: f64 = 0.5;
