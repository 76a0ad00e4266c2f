/**
 * Feedback Service
 *
 * Collects helpful / not-helpful votes on individual predictions.
 *
 * Storage is behind the `FeedbackStore` trait so callers inject whatever
 * backing they need; `InMemoryFeedbackStore` keeps everything in DashMaps.
 */

use crate::error::FeedbackError;
use crate::types::{FeedbackKey, FeedbackStats, FeedbackVote};
use dashmap::DashMap;
use std::collections::HashMap;
use tracing::debug;

/// Storage for prediction feedback.
pub trait FeedbackStore: Send + Sync {
    /// Submit a vote. Each voter may vote once per prediction.
    /// Returns the updated tally.
    fn submit(
        &self,
        key: &FeedbackKey,
        voter: &str,
        vote: FeedbackVote,
    ) -> Result<FeedbackStats, FeedbackError>;

    /// Current tally for a prediction (empty if nobody voted).
    fn stats(&self, key: &FeedbackKey) -> FeedbackStats;

    /// The vote a voter cast on a prediction, if any.
    fn vote_of(&self, key: &FeedbackKey, voter: &str) -> Option<FeedbackVote>;

    /// Whether a voter already voted on a prediction.
    fn has_voted(&self, key: &FeedbackKey, voter: &str) -> bool {
        self.vote_of(key, voter).is_some()
    }
}

/// In-process feedback store.
#[derive(Default)]
pub struct InMemoryFeedbackStore {
    /// Tally per prediction.
    stats: DashMap<FeedbackKey, FeedbackStats>,
    /// Votes per prediction: voter -> vote.
    votes: DashMap<FeedbackKey, HashMap<String, FeedbackVote>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackStore for InMemoryFeedbackStore {
    fn submit(
        &self,
        key: &FeedbackKey,
        voter: &str,
        vote: FeedbackVote,
    ) -> Result<FeedbackStats, FeedbackError> {
        if voter.trim().is_empty() {
            return Err(FeedbackError::EmptyVoter);
        }

        // Holding the votes entry serializes concurrent submits for this key.
        let mut voters = self.votes.entry(key.clone()).or_default();
        if voters.contains_key(voter) {
            return Err(FeedbackError::AlreadySubmitted {
                voter: voter.to_string(),
                asset_id: key.asset_id.clone(),
                predicted_at: key.predicted_at.to_rfc3339(),
            });
        }
        voters.insert(voter.to_string(), vote);

        let mut stats = self.stats.entry(key.clone()).or_default();
        stats.record(vote);

        debug!(
            "Feedback for {} at {}: {}/{} helpful",
            key.asset_id, key.predicted_at, stats.helpful_count, stats.total_votes
        );
        Ok(*stats)
    }

    fn stats(&self, key: &FeedbackKey) -> FeedbackStats {
        self.stats.get(key).map(|s| *s).unwrap_or_default()
    }

    fn vote_of(&self, key: &FeedbackKey, voter: &str) -> Option<FeedbackVote> {
        self.votes
            .get(key)
            .and_then(|voters| voters.get(voter).copied())
    }
}
