use crate::types::{ConfidenceTier, Direction, Timeframe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How per-timeframe weights are turned into bucket shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightingMode {
    /// Only direction and timeframe weight count; confidence is ignored.
    #[default]
    DirectionOnly,
    /// Each timeframe weight is scaled by `confidence / 100` before bucketing.
    ConfidenceWeighted,
}

impl WeightingMode {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "direction" | "direction_only" | "baseline" => Some(Self::DirectionOnly),
            "confidence" | "confidence_weighted" => Some(Self::ConfidenceWeighted),
            _ => None,
        }
    }
}

/// What to do with string-keyed input whose key is not a canonical timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTimeframePolicy {
    #[default]
    Reject,
    Ignore,
}

impl UnknownTimeframePolicy {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "strict" => Some(Self::Reject),
            "ignore" | "skip" => Some(Self::Ignore),
            _ => None,
        }
    }
}

/// Aggregated directional agreement across timeframes.
///
/// The three percentages always sum to exactly 100. `weighted` is the
/// exact bullish share minus the exact bearish share, rounded on its own,
/// so it can differ from `bullish_percent - bearish_percent` by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfluenceScore {
    #[serde(rename = "bullish")]
    pub bullish_percent: u8,
    #[serde(rename = "bearish")]
    pub bearish_percent: u8,
    #[serde(rename = "neutral")]
    pub neutral_percent: u8,
    /// Signed aggregate, -100 (all bearish) to +100 (all bullish).
    pub weighted: i8,
}

impl ConfluenceScore {
    /// Score with every timeframe neutral.
    pub fn neutral() -> Self {
        Self {
            bullish_percent: 0,
            bearish_percent: 0,
            neutral_percent: 100,
            weighted: 0,
        }
    }

    /// Classify the weighted score.
    pub fn bias(&self) -> ConfluenceBias {
        ConfluenceBias::from_weighted(self.weighted)
    }

    /// True when some timeframes point bullish while others point bearish.
    pub fn has_conflict(&self) -> bool {
        self.bullish_percent > 0 && self.bearish_percent > 0
    }

    /// True when every timeframe with a direction points the same way.
    /// An all-neutral score counts as aligned.
    pub fn is_aligned(&self) -> bool {
        !self.has_conflict()
    }

    /// Direction holding the largest share. Ties resolve to `Neutral`.
    pub fn dominant_direction(&self) -> Direction {
        let (bull, bear, neutral) = (
            self.bullish_percent,
            self.bearish_percent,
            self.neutral_percent,
        );
        if bull > bear && bull > neutral {
            Direction::Bullish
        } else if bear > bull && bear > neutral {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    }
}

/// Overall market bias implied by a weighted confluence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfluenceBias {
    StrongBullish,
    ModerateBullish,
    SlightBullish,
    Neutral,
    SlightBearish,
    ModerateBearish,
    StrongBearish,
}

impl ConfluenceBias {
    /// Create bias from a weighted score (-100 to +100).
    pub fn from_weighted(weighted: i8) -> Self {
        match weighted {
            w if w > 50 => Self::StrongBullish,
            w if w > 25 => Self::ModerateBullish,
            w if w > 0 => Self::SlightBullish,
            0 => Self::Neutral,
            w if w > -25 => Self::SlightBearish,
            w if w > -50 => Self::ModerateBearish,
            _ => Self::StrongBearish,
        }
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongBullish => "Strong Bullish",
            Self::ModerateBullish => "Moderate Bullish",
            Self::SlightBullish => "Slight Bullish",
            Self::Neutral => "Neutral",
            Self::SlightBearish => "Slight Bearish",
            Self::ModerateBearish => "Moderate Bearish",
            Self::StrongBearish => "Strong Bearish",
        }
    }

    /// One-line explanation suitable for a summary card.
    pub fn description(&self) -> &'static str {
        match self {
            Self::StrongBullish => "Strong bullish confluence across timeframes",
            Self::ModerateBullish => "Moderate bullish confluence across timeframes",
            Self::SlightBullish => "Slight bullish bias across timeframes",
            Self::Neutral => "Neutral confluence across timeframes",
            Self::SlightBearish => "Slight bearish bias across timeframes",
            Self::ModerateBearish => "Moderate bearish confluence across timeframes",
            Self::StrongBearish => "Strong bearish confluence across timeframes",
        }
    }

    /// Net direction of the bias.
    pub fn direction(&self) -> Direction {
        match self {
            Self::StrongBullish | Self::ModerateBullish | Self::SlightBullish => Direction::Bullish,
            Self::Neutral => Direction::Neutral,
            Self::SlightBearish | Self::ModerateBearish | Self::StrongBearish => Direction::Bearish,
        }
    }
}

/// How one timeframe fed into a confluence evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeContribution {
    pub timeframe: Timeframe,
    pub direction: Direction,
    pub confidence: f64,
    pub tier: ConfidenceTier,
    /// Configured timeframe weight.
    pub weight: f64,
    /// Weight actually applied under the scorer's weighting mode.
    pub effective_weight: f64,
    pub pattern: String,
}

/// Full result of a confluence evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfluenceReport {
    pub score: ConfluenceScore,
    pub bias: ConfluenceBias,
    pub mode: WeightingMode,
    /// Contributions in canonical timeframe order.
    pub contributions: Vec<TimeframeContribution>,
    pub computed_at: DateTime<Utc>,
}

impl ConfluenceReport {
    /// Contribution for a specific timeframe.
    pub fn contribution(&self, timeframe: Timeframe) -> Option<&TimeframeContribution> {
        self.contributions.iter().find(|c| c.timeframe == timeframe)
    }

    /// Human-readable summary line.
    pub fn summary(&self) -> String {
        format!(
            "{} ({:+}): {}% bullish, {}% bearish, {}% neutral",
            self.bias.label(),
            self.score.weighted,
            self.score.bullish_percent,
            self.score.bearish_percent,
            self.score.neutral_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bias_thresholds() {
        assert_eq!(ConfluenceBias::from_weighted(100), ConfluenceBias::StrongBullish);
        assert_eq!(ConfluenceBias::from_weighted(51), ConfluenceBias::StrongBullish);
        assert_eq!(ConfluenceBias::from_weighted(50), ConfluenceBias::ModerateBullish);
        assert_eq!(ConfluenceBias::from_weighted(26), ConfluenceBias::ModerateBullish);
        assert_eq!(ConfluenceBias::from_weighted(25), ConfluenceBias::SlightBullish);
        assert_eq!(ConfluenceBias::from_weighted(1), ConfluenceBias::SlightBullish);
        assert_eq!(ConfluenceBias::from_weighted(0), ConfluenceBias::Neutral);
        assert_eq!(ConfluenceBias::from_weighted(-1), ConfluenceBias::SlightBearish);
        assert_eq!(ConfluenceBias::from_weighted(-25), ConfluenceBias::ModerateBearish);
        assert_eq!(ConfluenceBias::from_weighted(-50), ConfluenceBias::StrongBearish);
        assert_eq!(ConfluenceBias::from_weighted(-100), ConfluenceBias::StrongBearish);
    }

    #[test]
    fn test_score_wire_names() {
        let score = ConfluenceScore {
            bullish_percent: 70,
            bearish_percent: 10,
            neutral_percent: 20,
            weighted: 60,
        };
        let json = serde_json::to_value(score).unwrap();
        assert_eq!(json["bullish"], 70);
        assert_eq!(json["bearish"], 10);
        assert_eq!(json["neutral"], 20);
        assert_eq!(json["weighted"], 60);
    }

    #[test]
    fn test_dominant_direction_and_conflict() {
        let score = ConfluenceScore {
            bullish_percent: 70,
            bearish_percent: 10,
            neutral_percent: 20,
            weighted: 60,
        };
        assert_eq!(score.dominant_direction(), Direction::Bullish);
        assert!(score.has_conflict());

        let neutral = ConfluenceScore::neutral();
        assert_eq!(neutral.dominant_direction(), Direction::Neutral);
        assert!(!neutral.has_conflict());
        assert_eq!(neutral.bias(), ConfluenceBias::Neutral);
    }

    #[test]
    fn test_is_aligned() {
        let aligned = ConfluenceScore {
            bullish_percent: 70,
            bearish_percent: 0,
            neutral_percent: 30,
            weighted: 70,
        };
        assert!(aligned.is_aligned());

        let conflicting = ConfluenceScore {
            bullish_percent: 60,
            bearish_percent: 40,
            neutral_percent: 0,
            weighted: 20,
        };
        assert!(!conflicting.is_aligned());
        assert!(conflicting.has_conflict());

        assert!(ConfluenceScore::neutral().is_aligned());
    }

    #[test]
    fn test_weighting_mode_from_str() {
        assert_eq!(WeightingMode::from_str("confidence"), Some(WeightingMode::ConfidenceWeighted));
        assert_eq!(WeightingMode::from_str("Direction"), Some(WeightingMode::DirectionOnly));
        assert_eq!(WeightingMode::from_str("votes"), None);
    }
}
