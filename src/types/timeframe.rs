use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Analysis interval a directional signal is evaluated over.
///
/// Variants are declared longest first, so `Ord` follows the canonical
/// display order used by the dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "15m")]
    FifteenMinutes,
}

impl Timeframe {
    /// The canonical timeframe set, longest first.
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Daily,
        Timeframe::FourHours,
        Timeframe::OneHour,
        Timeframe::FifteenMinutes,
    ];

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "1d" | "d" => Some(Self::Daily),
            "4h" | "4hour" => Some(Self::FourHours),
            "1h" | "1hour" => Some(Self::OneHour),
            "15m" | "15min" => Some(Self::FifteenMinutes),
            _ => None,
        }
    }

    /// Canonical identifier, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::FourHours => "4h",
            Self::OneHour => "1h",
            Self::FifteenMinutes => "15m",
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::FourHours => "4 Hour",
            Self::OneHour => "1 Hour",
            Self::FifteenMinutes => "15 Min",
        }
    }

    /// Length of one interval in seconds.
    pub fn duration_seconds(&self) -> i64 {
        match self {
            Self::Daily => 86_400,
            Self::FourHours => 14_400,
            Self::OneHour => 3_600,
            Self::FifteenMinutes => 900,
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Daily => 0,
            Self::FourHours => 1,
            Self::OneHour => 2,
            Self::FifteenMinutes => 3,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tolerance allowed when checking that weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Static weight table, one entry per canonical timeframe.
///
/// Construction validates that every weight lies in [0, 1] and that the
/// table sums to 1.0, so a value of this type is always usable as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeframeWeights {
    #[serde(rename = "daily")]
    daily: f64,
    #[serde(rename = "4h")]
    four_hours: f64,
    #[serde(rename = "1h")]
    one_hour: f64,
    #[serde(rename = "15m")]
    fifteen_minutes: f64,
}

impl Default for TimeframeWeights {
    fn default() -> Self {
        Self {
            daily: 0.40,
            four_hours: 0.30,
            one_hour: 0.20,
            fifteen_minutes: 0.10,
        }
    }
}

impl TimeframeWeights {
    /// Build a validated weight table.
    pub fn new(
        daily: f64,
        four_hours: f64,
        one_hour: f64,
        fifteen_minutes: f64,
    ) -> Result<Self, ConfigError> {
        let weights = Self {
            daily,
            four_hours,
            one_hour,
            fifteen_minutes,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Build from `(timeframe, weight)` pairs. Every canonical timeframe
    /// must appear; later duplicates overwrite earlier ones.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (Timeframe, f64)>,
    {
        let mut slots: [Option<f64>; 4] = [None; 4];
        for (timeframe, weight) in pairs {
            slots[timeframe.index()] = Some(weight);
        }

        let mut values = [0.0; 4];
        for timeframe in Timeframe::ALL {
            values[timeframe.index()] = slots[timeframe.index()].ok_or_else(|| {
                ConfigError::InvalidWeights(format!("no weight for {}", timeframe))
            })?;
        }

        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Weight for a timeframe.
    pub fn get(&self, timeframe: Timeframe) -> f64 {
        match timeframe {
            Timeframe::Daily => self.daily,
            Timeframe::FourHours => self.four_hours,
            Timeframe::OneHour => self.one_hour,
            Timeframe::FifteenMinutes => self.fifteen_minutes,
        }
    }

    /// Iterate weights in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Timeframe, f64)> + '_ {
        Timeframe::ALL.into_iter().map(move |tf| (tf, self.get(tf)))
    }

    /// Sum of all weights (1.0 for any validated table).
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, w)| w).sum()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (timeframe, weight) in self.iter() {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::InvalidWeights(format!(
                    "{} weight {} is outside [0, 1]",
                    timeframe, weight
                )));
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights(format!(
                "weights sum to {}, expected 1.0",
                total
            )));
        }

        Ok(())
    }
}
