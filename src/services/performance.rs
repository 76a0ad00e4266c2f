//! Win-rate tracking for published predictions.

use crate::error::TrackerError;
use crate::types::{
    ConfidenceThresholds, Direction, HistoricalPrediction, PerformanceSummary, Timeframe,
    TimeframeSignal,
};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Store of predictions and their outcomes.
pub struct PerformanceTracker {
    /// All predictions by id, resolved or not.
    predictions: DashMap<Uuid, HistoricalPrediction>,
}

impl PerformanceTracker {
    /// Create a new tracker.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            predictions: DashMap::new(),
        })
    }

    /// Record a prediction. Returns its id.
    pub fn record(&self, prediction: HistoricalPrediction) -> Uuid {
        let id = prediction.id;
        debug!(
            "Recorded {} prediction for {} ({})",
            prediction.direction.label(),
            prediction.asset_id,
            prediction.timeframe
        );
        self.predictions.insert(id, prediction);
        id
    }

    /// Record every signal of a multi-timeframe set, in canonical order.
    pub fn record_signals(
        &self,
        asset_id: &str,
        signals: &HashMap<Timeframe, TimeframeSignal>,
        thresholds: &ConfidenceThresholds,
    ) -> Vec<Uuid> {
        Timeframe::ALL
            .iter()
            .filter_map(|tf| signals.get(tf))
            .map(|signal| {
                self.record(HistoricalPrediction::from_signal(
                    asset_id, signal, thresholds,
                ))
            })
            .collect()
    }

    /// Attach the observed direction to a prediction.
    /// Returns whether the prediction was correct.
    pub fn resolve(&self, id: Uuid, actual: Direction) -> Result<bool, TrackerError> {
        let mut entry = self
            .predictions
            .get_mut(&id)
            .ok_or(TrackerError::NotFound(id))?;

        if entry.actual_direction.is_some() {
            return Err(TrackerError::AlreadyResolved(id));
        }

        entry.resolve(actual);
        let correct = entry.direction == actual;
        info!(
            "Resolved prediction {} for {}: predicted {}, actual {} ({})",
            id,
            entry.asset_id,
            entry.direction.label(),
            actual.label(),
            if correct { "correct" } else { "incorrect" }
        );
        Ok(correct)
    }

    /// Get a prediction by id.
    pub fn get(&self, id: Uuid) -> Option<HistoricalPrediction> {
        self.predictions.get(&id).map(|e| e.clone())
    }

    /// All predictions for an asset, oldest first.
    pub fn asset_predictions(&self, asset_id: &str) -> Vec<HistoricalPrediction> {
        let mut predictions: Vec<HistoricalPrediction> = self
            .predictions
            .iter()
            .filter(|entry| entry.asset_id == asset_id)
            .map(|entry| entry.value().clone())
            .collect();
        predictions.sort_by_key(|p| p.predicted_at);
        predictions
    }

    /// Number of predictions still waiting for an outcome.
    pub fn pending_count(&self) -> usize {
        self.predictions
            .iter()
            .filter(|entry| entry.actual_direction.is_none())
            .count()
    }

    /// Total number of predictions recorded.
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Win rates over every resolved prediction.
    pub fn summary(&self) -> PerformanceSummary {
        let mut summary = PerformanceSummary::default();
        for entry in self.predictions.iter() {
            summary.record(entry.value());
        }
        summary
    }
}
