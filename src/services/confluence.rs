//! Multi-timeframe confluence scoring.
//!
//! Aggregates one directional signal per canonical timeframe into bullish,
//! bearish and neutral shares plus a signed weighted score. Longer
//! timeframes carry more weight (see [`TimeframeWeights`]).

use crate::error::InvalidInput;
use crate::types::{
    ConfidenceThresholds, ConfluenceBias, ConfluenceReport, ConfluenceScore, Direction,
    RawTimeframeSignal, Timeframe, TimeframeContribution, TimeframeSignal, TimeframeWeights,
    UnknownTimeframePolicy, WeightingMode,
};
use chrono::Utc;
use std::collections::HashMap;
use tracing::debug;

/// Stateless confluence scorer.
///
/// Holds only immutable configuration, so a single instance can be shared
/// across threads and called concurrently.
#[derive(Debug, Clone, Default)]
pub struct ConfluenceScorer {
    weights: TimeframeWeights,
    mode: WeightingMode,
    unknown_policy: UnknownTimeframePolicy,
    thresholds: ConfidenceThresholds,
}

impl ConfluenceScorer {
    /// Scorer with the default weight table, direction-only weighting and
    /// strict key validation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, weights: TimeframeWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_mode(mut self, mode: WeightingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_unknown_policy(mut self, policy: UnknownTimeframePolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Read-only weight table.
    pub fn weights(&self) -> &TimeframeWeights {
        &self.weights
    }

    pub fn mode(&self) -> WeightingMode {
        self.mode
    }

    pub fn unknown_policy(&self) -> UnknownTimeframePolicy {
        self.unknown_policy
    }

    pub fn thresholds(&self) -> &ConfidenceThresholds {
        &self.thresholds
    }

    /// Compute the confluence score for a complete signal set.
    pub fn compute(
        &self,
        signals: &HashMap<Timeframe, TimeframeSignal>,
    ) -> Result<ConfluenceScore, InvalidInput> {
        let ordered = self.validate(signals)?;
        let score = self.score(&ordered);

        debug!(
            weighted = score.weighted,
            bullish = score.bullish_percent,
            bearish = score.bearish_percent,
            neutral = score.neutral_percent,
            "Computed confluence"
        );

        Ok(score)
    }

    /// Compute the score plus a per-timeframe breakdown.
    pub fn evaluate(
        &self,
        signals: &HashMap<Timeframe, TimeframeSignal>,
    ) -> Result<ConfluenceReport, InvalidInput> {
        let ordered = self.validate(signals)?;
        let score = self.score(&ordered);

        let contributions = ordered
            .iter()
            .map(|signal| TimeframeContribution {
                timeframe: signal.timeframe,
                direction: signal.direction,
                confidence: signal.confidence,
                tier: signal.tier(&self.thresholds),
                weight: self.weights.get(signal.timeframe),
                effective_weight: self.effective_weight(signal),
                pattern: signal.pattern.clone(),
            })
            .collect();

        Ok(ConfluenceReport {
            score,
            bias: ConfluenceBias::from_weighted(score.weighted),
            mode: self.mode,
            contributions,
            computed_at: Utc::now(),
        })
    }

    /// Compute from string-keyed, untyped input.
    pub fn compute_raw(
        &self,
        raw: &HashMap<String, RawTimeframeSignal>,
    ) -> Result<ConfluenceScore, InvalidInput> {
        self.compute(&self.parse_raw(raw)?)
    }

    /// Evaluate from string-keyed, untyped input.
    pub fn evaluate_raw(
        &self,
        raw: &HashMap<String, RawTimeframeSignal>,
    ) -> Result<ConfluenceReport, InvalidInput> {
        self.evaluate(&self.parse_raw(raw)?)
    }

    /// Validate keys and direction labels of untyped input.
    ///
    /// Keys may use any alias accepted by [`Timeframe::from_str`]. Unknown
    /// keys are handled per the scorer's [`UnknownTimeframePolicy`]; two keys
    /// naming the same timeframe are always rejected.
    pub fn parse_raw(
        &self,
        raw: &HashMap<String, RawTimeframeSignal>,
    ) -> Result<HashMap<Timeframe, TimeframeSignal>, InvalidInput> {
        // Sorted so the reported error does not depend on hash order.
        let mut keys: Vec<&String> = raw.keys().collect();
        keys.sort();

        let mut parsed = HashMap::with_capacity(Timeframe::ALL.len());
        for key in keys {
            let Some(timeframe) = Timeframe::from_str(key) else {
                match self.unknown_policy {
                    UnknownTimeframePolicy::Reject => {
                        return Err(InvalidInput::UnknownTimeframe(key.clone()));
                    }
                    UnknownTimeframePolicy::Ignore => {
                        debug!(key = %key, "Ignoring unknown timeframe");
                        continue;
                    }
                }
            };

            if parsed.contains_key(&timeframe) {
                return Err(InvalidInput::DuplicateTimeframe(timeframe));
            }

            let signal = raw[key].clone().into_signal(timeframe)?;
            parsed.insert(timeframe, signal);
        }

        Ok(parsed)
    }

    /// Check completeness and ranges; returns signals in canonical order.
    fn validate<'a>(
        &self,
        signals: &'a HashMap<Timeframe, TimeframeSignal>,
    ) -> Result<[&'a TimeframeSignal; 4], InvalidInput> {
        let lookup = move |timeframe: Timeframe| -> Result<&'a TimeframeSignal, InvalidInput> {
            let signal = signals
                .get(&timeframe)
                .ok_or(InvalidInput::MissingTimeframe(timeframe))?;
            if signal.timeframe != timeframe {
                return Err(InvalidInput::TimeframeMismatch {
                    key: timeframe,
                    actual: signal.timeframe,
                });
            }
            signal.validate()?;
            Ok(signal)
        };

        Ok([
            lookup(Timeframe::Daily)?,
            lookup(Timeframe::FourHours)?,
            lookup(Timeframe::OneHour)?,
            lookup(Timeframe::FifteenMinutes)?,
        ])
    }

    fn effective_weight(&self, signal: &TimeframeSignal) -> f64 {
        let weight = self.weights.get(signal.timeframe);
        match self.mode {
            WeightingMode::DirectionOnly => weight,
            WeightingMode::ConfidenceWeighted => weight * signal.confidence / 100.0,
        }
    }

    fn score(&self, signals: &[&TimeframeSignal; 4]) -> ConfluenceScore {
        // [bullish, bearish, neutral]
        let mut shares = [0.0_f64; 3];
        for signal in signals {
            let bucket = match signal.direction {
                Direction::Bullish => 0,
                Direction::Bearish => 1,
                Direction::Neutral => 2,
            };
            shares[bucket] += self.effective_weight(signal);
        }

        let Some([bullish, bearish, neutral]) = apportion(shares) else {
            return ConfluenceScore::neutral();
        };

        ConfluenceScore {
            bullish_percent: bullish,
            bearish_percent: bearish,
            neutral_percent: neutral,
            weighted: signed_aggregate(shares),
        }
    }
}

/// Exact bullish share minus exact bearish share, rounded once at the end.
///
/// Taken from the unrounded shares so that apportioning the percentages
/// cannot move the score across a bias boundary.
fn signed_aggregate(shares: [f64; 3]) -> i8 {
    let total: f64 = shares.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    ((shares[0] - shares[1]) / total * 100.0)
        .round()
        .clamp(-100.0, 100.0) as i8
}

/// Split 100 percentage points across buckets in proportion to `shares`
/// using the largest-remainder method, so the parts always sum to 100.
///
/// Returns `None` when the shares carry no weight at all. Equal remainders
/// go to the earlier bucket.
fn apportion(shares: [f64; 3]) -> Option<[u8; 3]> {
    let total: f64 = shares.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let exact = shares.map(|share| (share / total * 100.0).clamp(0.0, 100.0));
    let mut parts = exact.map(|value| value.floor() as u8);

    let assigned: u32 = parts.iter().map(|&p| p as u32).sum();
    let mut remaining = 100u32.saturating_sub(assigned);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        let rem_a = exact[a] - exact[a].floor();
        let rem_b = exact[b] - exact[b].floor();
        rem_b
            .partial_cmp(&rem_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    for index in order.into_iter().cycle() {
        if remaining == 0 {
            break;
        }
        parts[index] += 1;
        remaining -= 1;
    }

    Some(parts)
}

/// Score `signals` with the default scorer.
pub fn compute_confluence(
    signals: &HashMap<Timeframe, TimeframeSignal>,
) -> Result<ConfluenceScore, InvalidInput> {
    ConfluenceScorer::new().compute(signals)
}
