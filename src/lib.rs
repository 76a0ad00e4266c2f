//! Confluence - multi-timeframe confluence scoring for trading predictions
//!
//! Combines one directional signal per timeframe (`daily`, `4h`, `1h`,
//! `15m`) into a weighted bullish / bearish / neutral breakdown, and tracks
//! how those predictions perform and how users rate them.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, ConfigError, FeedbackError, InvalidInput, Result, TrackerError};
pub use services::{
    compute_confluence, ConfluenceScorer, FeedbackStore, InMemoryFeedbackStore, PerformanceTracker,
};
pub use types::*;
