//! Fix validation and rejection reasons

pub mod data;
pub mod error;

pub use data::FixValidator;
pub use error::{Rejection, RejectionKind, InvalidFixReason};
