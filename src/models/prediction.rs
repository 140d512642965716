use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
    Rise,
    Fall,
    Stable,
}

impl fmt::Display for PriceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceDirection::Rise => write!(f, "rise"),
            PriceDirection::Fall => write!(f, "fall"),
            PriceDirection::Stable => write!(f, "stable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Form trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameweekForecast {
    pub gameweek: u32,
    pub predicted_points: f64,
    /// 0–1, decays with forecast horizon.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTrendPrediction {
    pub player_id: i64,
    pub player_name: String,
    pub team_name: Option<String>,
    pub position: Option<String>,
    pub current_form: f64,
    pub historical_form: Vec<f64>,
    pub gameweeks: Vec<u32>,
    pub predicted_form: Vec<GameweekForecast>,
    pub trend: Trend,
    pub trend_strength: f64,
    pub volatility: f64,
    pub momentum: f64,
    /// Final level of the exponentially smoothed points series.
    pub smoothed_form: f64,
    pub reasoning: Vec<String>,
    pub overall_confidence: ConfidenceLevel,
}

impl FormTrendPrediction {
    /// Ranking key used when ordering forecasts across players.
    pub fn rank_score(&self) -> f64 {
        self.trend_strength * self.momentum
    }
}

// ---------------------------------------------------------------------------
// Price change
// ---------------------------------------------------------------------------

/// Value of `expected_change_date` when no change is expected soon.
pub const UNLIKELY_CHANGE: &str = "unlikely";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChangePrediction {
    pub player_id: i64,
    pub player_name: String,
    pub team_name: Option<String>,
    pub position: Option<String>,
    pub current_price: f64,
    pub price_change_direction: PriceDirection,
    /// 0–95 for rise/fall, exactly 5 when stable.
    pub probability: f64,
    #[serde(rename = "transfersIn24h")]
    pub transfers_in_24h: i64,
    #[serde(rename = "transfersOut24h")]
    pub transfers_out_24h: i64,
    pub transfer_delta: i64,
    pub ownership: f64,
    pub form: f64,
    pub reasoning: Vec<String>,
    /// `YYYY-MM-DD`, or `UNLIKELY_CHANGE`.
    pub expected_change_date: String,
    pub confidence: ConfidenceLevel,
}
