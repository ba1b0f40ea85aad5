//! Error taxonomy for the scoring core and its ingestion paths

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChallengeError {
    #[error("expected {expected} values (3 per hall), but got {actual}")]
    InvalidValueCount { expected: usize, actual: usize },

    #[error("value #{position} is not a valid number: {value:?}")]
    NonNumericValue { position: usize, value: String },

    #[error("value #{position} must not be negative: {value}")]
    NegativeValue { position: usize, value: f64 },

    #[error("reading {key:?} has invalid value {value}")]
    InvalidReading { key: String, value: String },

    #[error("malformed reading key: {0:?}")]
    MalformedKey(String),

    #[error("invalid reading key pattern: {0}")]
    KeyPattern(#[from] regex::Error),

    #[error("invalid timestamp in {field}: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Week `week` (1-based) starts more than a day after the previous week ended.
    #[error("timeline gap of {gap_hours}h before week {week}")]
    TimelineGap { week: usize, gap_hours: i64 },

    #[error("admin authorization required")]
    Unauthorized,
}

pub type Result<T> = std::result::Result<T, ChallengeError>;
