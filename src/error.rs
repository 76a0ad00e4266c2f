use crate::types::Timeframe;
use thiserror::Error;

/// Malformed input handed to the confluence scorer.
///
/// Every variant is a validation failure: the scorer performs no I/O, so
/// nothing here is retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("Missing signal for timeframe: {0}")]
    MissingTimeframe(Timeframe),

    #[error("Unknown timeframe: {0}")]
    UnknownTimeframe(String),

    #[error("Timeframe {0} supplied more than once")]
    DuplicateTimeframe(Timeframe),

    #[error("Signal keyed under {key} reports timeframe {actual}")]
    TimeframeMismatch { key: Timeframe, actual: Timeframe },

    #[error("Confidence {confidence} for {timeframe} is outside [0, 100]")]
    ConfidenceOutOfRange { timeframe: Timeframe, confidence: f64 },

    #[error("Unknown direction for {timeframe}: {label}")]
    UnknownDirection { timeframe: String, label: String },
}

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid timeframe weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid confidence thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Performance tracker errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("Prediction not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("Prediction already resolved: {0}")]
    AlreadyResolved(uuid::Uuid),
}

/// Feedback store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedbackError {
    #[error("Feedback already submitted by {voter} for {asset_id} at {predicted_at}")]
    AlreadySubmitted {
        voter: String,
        asset_id: String,
        predicted_at: String,
    },

    #[error("Voter id must not be empty")]
    EmptyVoter,
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
