use crate::core::Fix;
use crate::validation::error::{InvalidFixReason, Rejection};
use tracing::debug;

/// Structural checks applied to every fix before the accumulator's gates
#[derive(Debug, Clone, Default)]
pub struct FixValidator;

impl FixValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate coordinates and accuracy, and normalise the reported speed.
    ///
    /// A negative or non-finite speed is a source quirk rather than a broken
    /// fix, so it is dropped and the fix falls back to the geometric branch.
    pub fn validate(&self, fix: Fix) -> Result<Fix, Rejection> {
        if !fix.latitude.is_finite() || !fix.longitude.is_finite() {
            return Err(invalid(InvalidFixReason::NonFiniteCoordinate));
        }
        if !(-90.0..=90.0).contains(&fix.latitude) {
            return Err(invalid(InvalidFixReason::LatitudeOutOfRange));
        }
        if !(-180.0..=180.0).contains(&fix.longitude) {
            return Err(invalid(InvalidFixReason::LongitudeOutOfRange));
        }

        if let Some(accuracy) = fix.accuracy {
            // +inf is a known but useless radius and is left to the accuracy gate
            if accuracy.is_nan() {
                return Err(invalid(InvalidFixReason::NanAccuracy));
            }
            if accuracy < 0.0 {
                return Err(invalid(InvalidFixReason::NegativeAccuracy));
            }
        }

        let mut fix = fix;
        if let Some(speed) = fix.speed {
            if !speed.is_finite() || speed < 0.0 {
                debug!(speed, timestamp = fix.timestamp, "discarding unusable reported speed");
                fix.speed = None;
            }
        }

        Ok(fix)
    }
}

fn invalid(reason: InvalidFixReason) -> Rejection {
    Rejection::InvalidFix { reason }
}
