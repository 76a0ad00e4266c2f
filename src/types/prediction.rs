use crate::error::{ConfigError, InvalidInput};
use crate::types::Timeframe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Predicted market movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bullish" => Some(Self::Bullish),
            "bearish" => Some(Self::Bearish),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// +1 for bullish, -1 for bearish, 0 for neutral.
    pub fn sign(&self) -> i8 {
        match self {
            Self::Bullish => 1,
            Self::Bearish => -1,
            Self::Neutral => 0,
        }
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }
}

/// Coarse bucket for a signal's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High Confidence",
            Self::Medium => "Medium Confidence",
            Self::Low => "Low Confidence",
        }
    }
}

/// Lower bounds (inclusive, percent) for each confidence tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 80.0,
            medium: 65.0,
            low: 50.0,
        }
    }
}

impl ConfidenceThresholds {
    /// Build validated thresholds. Requires `0 <= low <= medium <= high <= 100`.
    pub fn new(high: f64, medium: f64, low: f64) -> Result<Self, ConfigError> {
        let thresholds = Self { high, medium, low };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 <= self.low
            && self.low <= self.medium
            && self.medium <= self.high
            && self.high <= 100.0;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::InvalidThresholds(format!(
                "expected 0 <= low ({}) <= medium ({}) <= high ({}) <= 100",
                self.low, self.medium, self.high
            )))
        }
    }

    /// Tier for a confidence value. Anything below `medium` is `Low`,
    /// including values under the `low` floor.
    pub fn tier_for(&self, confidence: f64) -> ConfidenceTier {
        if confidence >= self.high {
            ConfidenceTier::High
        } else if confidence >= self.medium {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    /// Whether a confidence clears the `low` floor at all.
    pub fn is_actionable(&self, confidence: f64) -> bool {
        confidence >= self.low
    }
}

/// Directional prediction for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeSignal {
    /// Timeframe this signal was evaluated over.
    pub timeframe: Timeframe,
    /// Predicted direction.
    pub direction: Direction,
    /// Certainty in `direction`, 0-100.
    pub confidence: f64,
    /// Detected pattern label (informational only).
    pub pattern: String,
    /// When the signal was generated.
    pub observed_at: DateTime<Utc>,
}

impl TimeframeSignal {
    /// Create a new signal stamped with the current time.
    pub fn new(
        timeframe: Timeframe,
        direction: Direction,
        confidence: f64,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            timeframe,
            direction,
            confidence,
            pattern: pattern.into(),
            observed_at: Utc::now(),
        }
    }

    /// Override the observation timestamp.
    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = at;
        self
    }

    /// Confidence tier under the given thresholds.
    pub fn tier(&self, thresholds: &ConfidenceThresholds) -> ConfidenceTier {
        thresholds.tier_for(self.confidence)
    }

    /// Check the confidence range.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.confidence.is_finite() && (0.0..=100.0).contains(&self.confidence) {
            Ok(())
        } else {
            Err(InvalidInput::ConfidenceOutOfRange {
                timeframe: self.timeframe,
                confidence: self.confidence,
            })
        }
    }
}

/// Untyped signal as received from a collector, before boundary validation.
///
/// The timeframe comes from the enclosing map key, and the direction is
/// kept as a plain label so that bad values surface as `InvalidInput`
/// rather than as a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimeframeSignal {
    pub direction: String,
    pub confidence: f64,
    #[serde(default)]
    pub pattern: String,
    #[serde(default = "Utc::now")]
    pub observed_at: DateTime<Utc>,
}

impl RawTimeframeSignal {
    /// Convert into a typed signal for `timeframe`.
    pub fn into_signal(self, timeframe: Timeframe) -> Result<TimeframeSignal, InvalidInput> {
        let direction =
            Direction::from_str(&self.direction).ok_or_else(|| InvalidInput::UnknownDirection {
                timeframe: timeframe.to_string(),
                label: self.direction.clone(),
            })?;

        Ok(TimeframeSignal {
            timeframe,
            direction,
            confidence: self.confidence,
            pattern: self.pattern,
            observed_at: self.observed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.tier_for(82.0), ConfidenceTier::High);
        assert_eq!(thresholds.tier_for(80.0), ConfidenceTier::High);
        assert_eq!(thresholds.tier_for(78.0), ConfidenceTier::Medium);
        assert_eq!(thresholds.tier_for(65.0), ConfidenceTier::Medium);
        assert_eq!(thresholds.tier_for(55.0), ConfidenceTier::Low);
        assert_eq!(thresholds.tier_for(10.0), ConfidenceTier::Low);
        assert!(!thresholds.is_actionable(10.0));
    }

    #[test]
    fn test_thresholds_must_be_ordered() {
        assert!(ConfidenceThresholds::new(70.0, 80.0, 50.0).is_err());
        assert!(ConfidenceThresholds::new(101.0, 80.0, 50.0).is_err());
        assert!(ConfidenceThresholds::new(90.0, 70.0, 40.0).is_ok());
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_string(&Direction::Bullish).unwrap();
        assert_eq!(json, "\"Bullish\"");
        assert!(serde_json::from_str::<Direction>("\"Sideways\"").is_err());
        assert_eq!(Direction::from_str("bearish"), Some(Direction::Bearish));
    }

    #[test]
    fn test_validate_confidence_range() {
        let ok = TimeframeSignal::new(Timeframe::Daily, Direction::Bullish, 100.0, "Doji");
        assert!(ok.validate().is_ok());

        let high = TimeframeSignal::new(Timeframe::Daily, Direction::Bullish, 100.5, "Doji");
        assert!(matches!(
            high.validate(),
            Err(InvalidInput::ConfidenceOutOfRange { .. })
        ));

        let nan = TimeframeSignal::new(Timeframe::OneHour, Direction::Neutral, f64::NAN, "Doji");
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_raw_signal_rejects_unknown_direction() {
        let raw = RawTimeframeSignal {
            direction: "Sideways".to_string(),
            confidence: 50.0,
            pattern: String::new(),
            observed_at: Utc::now(),
        };
        let err = raw.into_signal(Timeframe::FourHours).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::UnknownDirection {
                timeframe: "4h".to_string(),
                label: "Sideways".to_string(),
            }
        );
    }

    #[test]
    fn test_raw_signal_decodes_camel_case() {
        let raw: RawTimeframeSignal = serde_json::from_str(
            r#"{"direction":"Bullish","confidence":78,"pattern":"Bullish Engulfing","observedAt":"2025-05-16T00:00:00Z"}"#,
        )
        .unwrap();
        let signal = raw.into_signal(Timeframe::Daily).unwrap();
        assert_eq!(signal.direction, Direction::Bullish);
        assert_eq!(signal.pattern, "Bullish Engulfing");
    }
}
