//! Shared helpers for backend tests: one-time logging setup, unique
//! fixture names and assertions over the JSON error envelope.

pub mod error_envelope;
pub mod logging;
pub mod unique;

pub use error_envelope::{assert_error, assert_validation_errors};
pub use unique::unique_name;
