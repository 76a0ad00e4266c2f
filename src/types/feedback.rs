use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies the prediction a vote is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackKey {
    pub asset_id: String,
    pub predicted_at: DateTime<Utc>,
}

impl FeedbackKey {
    pub fn new(asset_id: impl Into<String>, predicted_at: DateTime<Utc>) -> Self {
        Self {
            asset_id: asset_id.into(),
            predicted_at,
        }
    }
}

/// A user's verdict on a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackVote {
    Helpful,
    NotHelpful,
}

/// Vote tally for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub helpful_count: u32,
    pub not_helpful_count: u32,
    pub total_votes: u32,
}

impl FeedbackStats {
    /// Count one vote.
    pub fn record(&mut self, vote: FeedbackVote) {
        match vote {
            FeedbackVote::Helpful => self.helpful_count += 1,
            FeedbackVote::NotHelpful => self.not_helpful_count += 1,
        }
        self.total_votes += 1;
    }

    /// Share of helpful votes (0-100), or `None` before any vote.
    pub fn helpful_percent(&self) -> Option<f64> {
        (self.total_votes > 0)
            .then(|| (self.helpful_count as f64 / self.total_votes as f64) * 100.0)
    }

    /// Classification of the tally, or `None` before any vote.
    pub fn insight(&self) -> Option<FeedbackInsight> {
        self.helpful_percent().map(FeedbackInsight::from_helpful_percent)
    }
}

/// How well a prediction type is received by users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackInsight {
    HighlyEffective,
    Effective,
    Learning,
}

impl FeedbackInsight {
    pub fn from_helpful_percent(pct: f64) -> Self {
        if pct >= 80.0 {
            Self::HighlyEffective
        } else if pct >= 60.0 {
            Self::Effective
        } else {
            Self::Learning
        }
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighlyEffective => "Highly Effective",
            Self::Effective => "Effective",
            Self::Learning => "Learning",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::HighlyEffective => "This prediction type is highly valued by users",
            Self::Effective => "This prediction type is generally helpful to users",
            Self::Learning => "Our system is learning to improve this prediction type",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats_have_no_insight() {
        let stats = FeedbackStats::default();
        assert_eq!(stats.helpful_percent(), None);
        assert_eq!(stats.insight(), None);
    }

    #[test]
    fn test_insight_thresholds() {
        let stats = FeedbackStats {
            helpful_count: 12,
            not_helpful_count: 3,
            total_votes: 15,
        };
        assert_eq!(stats.insight(), Some(FeedbackInsight::HighlyEffective));

        assert_eq!(FeedbackInsight::from_helpful_percent(79.9), FeedbackInsight::Effective);
        assert_eq!(FeedbackInsight::from_helpful_percent(60.0), FeedbackInsight::Effective);
        assert_eq!(FeedbackInsight::from_helpful_percent(59.9), FeedbackInsight::Learning);
    }

    #[test]
    fn test_record_votes() {
        let mut stats = FeedbackStats::default();
        stats.record(FeedbackVote::Helpful);
        stats.record(FeedbackVote::NotHelpful);
        stats.record(FeedbackVote::NotHelpful);

        assert_eq!(stats.helpful_count, 1);
        assert_eq!(stats.not_helpful_count, 2);
        assert_eq!(stats.total_votes, 3);
        assert_eq!(stats.insight(), Some(FeedbackInsight::Learning));
    }
}
