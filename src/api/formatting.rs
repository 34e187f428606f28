//! Snapshot output formatting
//!
//! Text for a terminal, JSON for tooling, CSV for appending to a log.

use crate::api::types::{OutputFormat, TrackSnapshot};

/// Human-readable text formatter
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// Single-line output
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    pub fn format(&self, snapshot: &TrackSnapshot) -> String {
        if self.compact {
            return format!(
                "Dist: {:.1} m | Fixes: {} | Rejected: {} | {:?}",
                snapshot.total_distance_m,
                snapshot.path_len,
                snapshot.rejections.total(),
                snapshot.phase
            );
        }

        let mut output = String::new();
        output.push_str("Track:\n");
        output.push_str(&format!("  State:        {:?}\n", snapshot.phase));
        output.push_str(&format!("  Distance:     {:.1} m\n", snapshot.total_distance_m));
        output.push_str(&format!("  Fixes:        {}\n", snapshot.path_len));
        output.push_str(&format!("  Elapsed:      {:.1} s\n", snapshot.elapsed_ms as f64 / 1000.0));
        output.push_str(&format!("  Displacement: {:.1} m\n", snapshot.net_displacement_m));
        if let Some(speed) = snapshot.average_speed_mps() {
            output.push_str(&format!("  Avg speed:    {:.2} m/s\n", speed));
        }

        if let Some(fix) = &snapshot.last_fix {
            output.push_str("\nLast fix:\n");
            output.push_str(&format!("  Latitude:  {:.6}°\n", fix.latitude));
            output.push_str(&format!("  Longitude: {:.6}°\n", fix.longitude));
            match fix.accuracy {
                Some(accuracy) => output.push_str(&format!("  Accuracy:  {:.1} m\n", accuracy)),
                None => output.push_str("  Accuracy:  unknown\n"),
            }
            if let Some(speed) = fix.speed {
                output.push_str(&format!("  Speed:     {:.2} m/s\n", speed));
            }
            output.push_str(&format!("  Timestamp: {} ms\n", fix.timestamp));
        }

        output.push_str("\nFiltering:\n");
        let stats = &snapshot.stats;
        output.push_str(&format!("  Speed distance:     {:.1} m\n", stats.speed_distance_m));
        output.push_str(&format!("  Geometric distance: {:.1} m\n", stats.geometric_distance_m));
        output.push_str(&format!("  Jitter discarded:   {}\n", stats.jitter_discarded));
        output.push_str(&format!("  Low accuracy:       {}\n", snapshot.rejections.low_accuracy));
        output.push_str(&format!("  Out of order:       {}\n", snapshot.rejections.out_of_order));
        output.push_str(&format!("  Invalid:            {}\n", snapshot.rejections.invalid));

        if let Some(rejection) = &snapshot.last_rejection {
            output.push_str(&format!("\nLast rejection: {}\n", rejection));
        }
        if let Some(error) = &snapshot.source_error {
            output.push_str(&format!("\nSource error: {}\n", error));
        }

        output
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Pretty print JSON
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format(&self, snapshot: &TrackSnapshot) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(snapshot)
        } else {
            serde_json::to_string(snapshot)
        }
    }
}

/// CSV formatter for data logging
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Include header row
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        concat!(
            "timestamp_ms,latitude,longitude,accuracy_m,total_distance_m,path_len,elapsed_ms,",
            "net_displacement_m,speed_distance_m,geometric_distance_m,jitter_discarded,",
            "low_accuracy,out_of_order,invalid"
        )
        .to_string()
    }

    pub fn format_row(&self, snapshot: &TrackSnapshot) -> String {
        let (timestamp, lat, lon, accuracy) = match &snapshot.last_fix {
            Some(fix) => (
                fix.timestamp.to_string(),
                format!("{:.6}", fix.latitude),
                format!("{:.6}", fix.longitude),
                fix.accuracy.map(|a| format!("{:.1}", a)).unwrap_or_default(),
            ),
            None => Default::default(),
        };

        format!(
            "{},{},{},{},{:.2},{},{},{:.2},{:.2},{:.2},{},{},{},{}",
            timestamp,
            lat,
            lon,
            accuracy,
            snapshot.total_distance_m,
            snapshot.path_len,
            snapshot.elapsed_ms,
            snapshot.net_displacement_m,
            snapshot.stats.speed_distance_m,
            snapshot.stats.geometric_distance_m,
            snapshot.stats.jitter_discarded,
            snapshot.rejections.low_accuracy,
            snapshot.rejections.out_of_order,
            snapshot.rejections.invalid
        )
    }

    pub fn format(&self, snapshot: &TrackSnapshot) -> String {
        if self.include_header {
            format!("{}\n{}", self.header(), self.format_row(snapshot))
        } else {
            self.format_row(snapshot)
        }
    }
}

/// Render a snapshot in the requested format with default formatter settings
pub fn render(snapshot: &TrackSnapshot, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(TextFormatter::new().format(snapshot)),
        OutputFormat::Json => JsonFormatter::pretty().format(snapshot),
        OutputFormat::Csv => Ok(CsvFormatter::new().format(snapshot)),
    }
}
