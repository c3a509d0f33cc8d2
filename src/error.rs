//! Error types for request validation and glare detection.
//!
//! [`InputError`] is produced before a request exists, [`DetectionError`]
//! while a valid request is being evaluated.

use thiserror::Error;

/// A request that never reaches the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// A required field was not supplied
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// Text that does not parse as a number
    #[error("`{field}` must be a floating point number (got {value:?})")]
    Malformed { field: &'static str, value: String },

    /// NaN or infinity
    #[error("`{field}` must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },

    /// Value outside the inclusive domain of the field
    #[error("`{field}` must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Field the request format does not define
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// Failure while evaluating a validated request.
///
/// Only [`DetectionError::LocationUnresolved`] is an expected outcome. The
/// other variants signal defects and are reported as internal errors.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// Neither the polygon lookup nor the nearest-zone fallback produced a
    /// known timezone
    #[error("cannot locate a timezone for ({latitude}, {longitude})")]
    LocationUnresolved { latitude: f64, longitude: f64 },

    /// The epoch does not fit a calendar date
    #[error("epoch {epoch} is outside the representable date range")]
    InstantOutOfRange { epoch: f64 },

    /// The solar position calculator failed
    #[error("solar position calculation failed: {0}")]
    Ephemeris(#[source] anyhow::Error),
}

impl DetectionError {
    /// Whether this error is a client-facing condition rather than a defect.
    pub fn is_client_facing(&self) -> bool {
        matches!(self, DetectionError::LocationUnresolved { .. })
    }
}
