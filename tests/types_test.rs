//! Unit tests for types module

use confluence::types::*;
use serde_json;

#[test]
fn test_timeframe_serialization() {
    assert_eq!(serde_json::to_string(&Timeframe::Daily).unwrap(), "\"daily\"");
    assert_eq!(serde_json::to_string(&Timeframe::FourHours).unwrap(), "\"4h\"");
    assert_eq!(serde_json::to_string(&Timeframe::OneHour).unwrap(), "\"1h\"");
    assert_eq!(
        serde_json::to_string(&Timeframe::FifteenMinutes).unwrap(),
        "\"15m\""
    );

    let parsed: Timeframe = serde_json::from_str("\"4h\"").unwrap();
    assert_eq!(parsed, Timeframe::FourHours);
    assert!(serde_json::from_str::<Timeframe>("\"1w\"").is_err());
}

#[test]
fn test_timeframe_from_str() {
    assert_eq!(Timeframe::from_str("daily"), Some(Timeframe::Daily));
    assert_eq!(Timeframe::from_str("4h"), Some(Timeframe::FourHours));
    assert_eq!(Timeframe::from_str("1h"), Some(Timeframe::OneHour));
    assert_eq!(Timeframe::from_str("15m"), Some(Timeframe::FifteenMinutes));
    assert_eq!(Timeframe::from_str("invalid"), None);
}

#[test]
fn test_timeframe_display() {
    assert_eq!(format!("{}", Timeframe::Daily), "daily");
    assert_eq!(format!("{}", Timeframe::FifteenMinutes), "15m");
    assert_eq!(Timeframe::FourHours.name(), "4 Hour");
    assert_eq!(Timeframe::FifteenMinutes.name(), "15 Min");
}

#[test]
fn test_timeframe_duration_seconds() {
    assert_eq!(Timeframe::Daily.duration_seconds(), 86400);
    assert_eq!(Timeframe::FourHours.duration_seconds(), 14400);
    assert_eq!(Timeframe::OneHour.duration_seconds(), 3600);
    assert_eq!(Timeframe::FifteenMinutes.duration_seconds(), 900);
}

#[test]
fn test_weights_iter_canonical_order() {
    let weights: Vec<(Timeframe, f64)> = TimeframeWeights::default().iter().collect();
    assert_eq!(
        weights,
        vec![
            (Timeframe::Daily, 0.40),
            (Timeframe::FourHours, 0.30),
            (Timeframe::OneHour, 0.20),
            (Timeframe::FifteenMinutes, 0.10),
        ]
    );
}

#[test]
fn test_weights_serialize_as_map() {
    let json = serde_json::to_value(TimeframeWeights::default()).unwrap();
    assert_eq!(json["daily"], 0.4);
    assert_eq!(json["15m"], 0.1);
}

#[test]
fn test_direction_sign() {
    assert_eq!(Direction::Bullish.sign(), 1);
    assert_eq!(Direction::Bearish.sign(), -1);
    assert_eq!(Direction::Neutral.sign(), 0);
}

#[test]
fn test_confidence_tier_serialization() {
    assert_eq!(
        serde_json::to_string(&ConfidenceTier::High).unwrap(),
        "\"high\""
    );
    let parsed: ConfidenceTier = serde_json::from_str("\"medium\"").unwrap();
    assert_eq!(parsed, ConfidenceTier::Medium);
    assert_eq!(ConfidenceTier::Low.label(), "Low Confidence");
}

#[test]
fn test_signal_round_trip_uses_camel_case() {
    let signal = TimeframeSignal::new(Timeframe::OneHour, Direction::Neutral, 55.0, "Doji");
    let json = serde_json::to_value(&signal).unwrap();
    assert_eq!(json["timeframe"], "1h");
    assert_eq!(json["direction"], "Neutral");
    assert!(json.get("observedAt").is_some());

    let back: TimeframeSignal = serde_json::from_value(json).unwrap();
    assert_eq!(back, signal);
}

#[test]
fn test_bias_labels() {
    assert_eq!(ConfluenceBias::from_weighted(35).label(), "Moderate Bullish");
    assert_eq!(
        ConfluenceBias::from_weighted(-30).description(),
        "Moderate bearish confluence across timeframes"
    );
    assert_eq!(ConfluenceBias::from_weighted(-10).direction(), Direction::Bearish);
    assert_eq!(ConfluenceBias::from_weighted(0).direction(), Direction::Neutral);
}

#[test]
fn test_score_deserialization() {
    let score: ConfluenceScore =
        serde_json::from_str(r#"{"bullish":50,"bearish":25,"neutral":25,"weighted":35}"#)
            .unwrap();
    assert_eq!(score.bullish_percent, 50);
    assert_eq!(score.weighted, 35);
    assert_eq!(score.bias(), ConfluenceBias::ModerateBullish);
}

#[test]
fn test_asset_serialization() {
    let asset = Asset {
        id: "xauusd".to_string(),
        name: "Gold".to_string(),
        symbol: "XAU/USD".to_string(),
        asset_class: AssetClass::Metals,
    };
    let json = serde_json::to_value(&asset).unwrap();
    assert_eq!(json["assetClass"], "metals");
}

#[test]
fn test_feedback_stats_serialization() {
    let stats = FeedbackStats {
        helpful_count: 12,
        not_helpful_count: 3,
        total_votes: 15,
    };
    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["helpfulCount"], 12);
    assert_eq!(json["notHelpfulCount"], 3);
    assert_eq!(json["totalVotes"], 15);
    assert_eq!(stats.helpful_percent(), Some(80.0));
}

#[test]
fn test_historical_prediction_correctness() {
    let signal = TimeframeSignal::new(Timeframe::Daily, Direction::Bullish, 82.0, "Hammer");
    let mut prediction =
        HistoricalPrediction::from_signal("btc", &signal, &ConfidenceThresholds::default());
    assert_eq!(prediction.tier, ConfidenceTier::High);
    assert_eq!(prediction.correct(), None);

    prediction.resolve(Direction::Bearish);
    assert_eq!(prediction.correct(), Some(false));

    let json = serde_json::to_value(&prediction).unwrap();
    assert_eq!(json["actualDirection"], "Bearish");
    assert_eq!(json["tier"], "high");
}
