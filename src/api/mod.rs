//! Read-only presentation surface
//!
//! Snapshot types polled by a UI after each `ingest`, and the formatters that
//! render them.

pub mod types;
pub mod formatting;

pub use types::{TrackSnapshot, OutputFormat};
pub use formatting::{TextFormatter, JsonFormatter, CsvFormatter, render};
