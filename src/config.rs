use crate::error::ConfigError;
use crate::services::ConfluenceScorer;
use crate::types::{
    ConfidenceThresholds, Timeframe, TimeframeWeights, UnknownTimeframePolicy, WeightingMode,
};
use std::env;
use std::str::FromStr;
use tracing::warn;

/// Raw timeframe weights as read from the environment.
///
/// Validated only when turned into a [`TimeframeWeights`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightConfig {
    pub daily: f64,
    pub four_hours: f64,
    pub one_hour: f64,
    pub fifteen_minutes: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        let defaults = TimeframeWeights::default();
        Self {
            daily: defaults.get(Timeframe::Daily),
            four_hours: defaults.get(Timeframe::FourHours),
            one_hour: defaults.get(Timeframe::OneHour),
            fifteen_minutes: defaults.get(Timeframe::FifteenMinutes),
        }
    }
}

impl WeightConfig {
    pub fn to_weights(&self) -> Result<TimeframeWeights, ConfigError> {
        TimeframeWeights::new(
            self.daily,
            self.four_hours,
            self.one_hour,
            self.fifteen_minutes,
        )
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Per-timeframe weights.
    pub weights: WeightConfig,
    /// Whether signal confidence scales the timeframe weights.
    pub mode: WeightingMode,
    /// Handling of non-canonical timeframe keys in raw input.
    pub unknown_timeframes: UnknownTimeframePolicy,
    /// Confidence tier thresholds (percent).
    pub thresholds: ConfidenceThresholds,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing variables take their defaults; unparsable ones are logged
    /// and also fall back to the default.
    pub fn from_env() -> Self {
        let default_weights = WeightConfig::default();
        let default_thresholds = ConfidenceThresholds::default();

        Self {
            weights: WeightConfig {
                daily: parse_var("CONFLUENCE_WEIGHT_DAILY", default_weights.daily),
                four_hours: parse_var("CONFLUENCE_WEIGHT_4H", default_weights.four_hours),
                one_hour: parse_var("CONFLUENCE_WEIGHT_1H", default_weights.one_hour),
                fifteen_minutes: parse_var(
                    "CONFLUENCE_WEIGHT_15M",
                    default_weights.fifteen_minutes,
                ),
            },
            mode: env::var("CONFLUENCE_MODE")
                .ok()
                .and_then(|v| parse_with("CONFLUENCE_MODE", &v, WeightingMode::from_str))
                .unwrap_or_default(),
            unknown_timeframes: env::var("CONFLUENCE_UNKNOWN_TIMEFRAMES")
                .ok()
                .and_then(|v| {
                    parse_with(
                        "CONFLUENCE_UNKNOWN_TIMEFRAMES",
                        &v,
                        UnknownTimeframePolicy::from_str,
                    )
                })
                .unwrap_or_default(),
            thresholds: ConfidenceThresholds {
                high: parse_var("CONFIDENCE_HIGH", default_thresholds.high),
                medium: parse_var("CONFIDENCE_MEDIUM", default_thresholds.medium),
                low: parse_var("CONFIDENCE_LOW", default_thresholds.low),
            },
        }
    }

    /// Build a scorer from this configuration, validating the weight table
    /// and thresholds.
    pub fn scorer(&self) -> Result<ConfluenceScorer, ConfigError> {
        self.thresholds.validate()?;
        Ok(ConfluenceScorer::new()
            .with_weights(self.weights.to_weights()?)
            .with_mode(self.mode)
            .with_unknown_policy(self.unknown_timeframes)
            .with_thresholds(self.thresholds))
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| parse_with(key, &v, |s| s.trim().parse().ok()))
        .unwrap_or(default)
}

fn parse_with<T>(key: &str, value: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let parsed = parse(value);
    if parsed.is_none() {
        warn!(
            "{}",
            ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            }
        );
    }
    parsed
}
