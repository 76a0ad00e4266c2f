use crate::types::{ConfidenceThresholds, ConfidenceTier, Direction, Timeframe, TimeframeSignal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Market an asset trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Metals,
    Forex,
    Crypto,
}

/// A tracked instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub asset_class: AssetClass,
}

/// A prediction kept for later scoring against what the market did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPrediction {
    pub id: Uuid,
    pub asset_id: String,
    pub timeframe: Timeframe,
    pub direction: Direction,
    pub confidence: f64,
    pub tier: ConfidenceTier,
    pub pattern: String,
    pub predicted_at: DateTime<Utc>,
    /// What the market actually did, once known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_direction: Option<Direction>,
}

impl HistoricalPrediction {
    /// Record a signal as an unresolved prediction for `asset_id`.
    pub fn from_signal(
        asset_id: impl Into<String>,
        signal: &TimeframeSignal,
        thresholds: &ConfidenceThresholds,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id: asset_id.into(),
            timeframe: signal.timeframe,
            direction: signal.direction,
            confidence: signal.confidence,
            tier: signal.tier(thresholds),
            pattern: signal.pattern.clone(),
            predicted_at: signal.observed_at,
            actual_direction: None,
        }
    }

    /// Set the observed outcome.
    pub fn resolve(&mut self, actual: Direction) {
        self.actual_direction = Some(actual);
    }

    /// Whether the prediction matched the outcome. `None` while unresolved.
    pub fn correct(&self) -> Option<bool> {
        self.actual_direction.map(|actual| actual == self.direction)
    }
}

/// Win-rate statistics over a set of resolved predictions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// correct / total * 100, or 0 with no predictions.
    pub win_rate: f64,
    pub total_predictions: u32,
    pub correct_predictions: u32,
}

impl PerformanceMetrics {
    /// Record one resolved prediction.
    pub fn record(&mut self, correct: bool) {
        self.total_predictions += 1;
        if correct {
            self.correct_predictions += 1;
        }
        self.recalculate_win_rate();
    }

    fn recalculate_win_rate(&mut self) {
        self.win_rate = if self.total_predictions > 0 {
            (self.correct_predictions as f64 / self.total_predictions as f64) * 100.0
        } else {
            0.0
        };
    }
}

/// Per-tier breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub high: PerformanceMetrics,
    pub medium: PerformanceMetrics,
    pub low: PerformanceMetrics,
}

impl ConfidenceBreakdown {
    pub fn get(&self, tier: ConfidenceTier) -> &PerformanceMetrics {
        match tier {
            ConfidenceTier::High => &self.high,
            ConfidenceTier::Medium => &self.medium,
            ConfidenceTier::Low => &self.low,
        }
    }

    pub fn get_mut(&mut self, tier: ConfidenceTier) -> &mut PerformanceMetrics {
        match tier {
            ConfidenceTier::High => &mut self.high,
            ConfidenceTier::Medium => &mut self.medium,
            ConfidenceTier::Low => &mut self.low,
        }
    }
}

/// Performance overview shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub overall: PerformanceMetrics,
    pub by_confidence: ConfidenceBreakdown,
    pub by_asset: BTreeMap<String, PerformanceMetrics>,
    pub by_timeframe: BTreeMap<Timeframe, PerformanceMetrics>,
}

impl PerformanceSummary {
    /// Fold one resolved prediction into every breakdown.
    pub fn record(&mut self, prediction: &HistoricalPrediction) {
        let Some(correct) = prediction.correct() else {
            return;
        };

        self.overall.record(correct);
        self.by_confidence
            .get_mut(prediction.tier)
            .record(correct);
        self.by_asset
            .entry(prediction.asset_id.clone())
            .or_default()
            .record(correct);
        self.by_timeframe
            .entry(prediction.timeframe)
            .or_default()
            .record(correct);
    }
}
