use serde::{Deserialize, Serialize};

/// Feature names in the order the normalizer lays out each player vector.
pub const FEATURE_NAMES: [&str; 7] = [
    "form",
    "ownership",
    "xg_per_90",
    "xa_per_90",
    "ict_index",
    "price_value",
    "points_per_game",
];

/// Number of numeric features used for clustering.
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Numeric profile of a single player, joined with its team name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFeatures {
    pub player_id: i64,
    pub name: String,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub form: f64,
    /// Percentage of managers owning the player (0–100).
    #[serde(default)]
    pub ownership: f64,
    #[serde(default)]
    pub xg_per_90: f64,
    #[serde(default)]
    pub xa_per_90: f64,
    #[serde(default)]
    pub ict_index: f64,
    /// Current price in £m.
    #[serde(default)]
    pub price_value: f64,
    #[serde(default)]
    pub points_per_game: f64,
}

impl PlayerFeatures {
    /// Raw feature vector in `FEATURE_NAMES` order.
    pub fn vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.form,
            self.ownership,
            self.xg_per_90,
            self.xa_per_90,
            self.ict_index,
            self.price_value,
            self.points_per_game,
        ]
    }

    /// Replace non-finite stats with 0 so they cannot leak NaN into clustering.
    pub fn sanitized(mut self) -> Self {
        self.form = finite_or_zero(self.form);
        self.ownership = finite_or_zero(self.ownership);
        self.xg_per_90 = finite_or_zero(self.xg_per_90);
        self.xa_per_90 = finite_or_zero(self.xa_per_90);
        self.ict_index = finite_or_zero(self.ict_index);
        self.price_value = finite_or_zero(self.price_value);
        self.points_per_game = finite_or_zero(self.points_per_game);
        self
    }
}

/// One gameweek of a player's history, ascending by gameweek.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameweekSample {
    pub gameweek: u32,
    pub points: f64,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub form: f64,
    #[serde(default)]
    pub expected_goals: f64,
    #[serde(default)]
    pub expected_assists: f64,
    #[serde(default)]
    pub bps: i32,
    #[serde(default)]
    pub bonus: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
}

/// Player identity plus weekly history, the forecaster's per-player input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerHistory {
    pub player_id: i64,
    pub player_name: String,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub current_form: f64,
    #[serde(default)]
    pub history: Vec<PlayerGameweekSample>,
}

/// Aggregate transfer stats consumed by the price-change estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTransferStats {
    pub player_id: i64,
    pub player_name: String,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    pub current_price: f64,
    pub transfers_in: i64,
    pub transfers_out: i64,
    #[serde(default)]
    pub ownership: f64,
    #[serde(default)]
    pub form: f64,
}

/// Map a non-finite value (NaN, ±inf) to 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse a textual stat the way the upstream API serves them ("5.3", "", "abc").
/// Anything that is not a finite number becomes 0.
pub fn parse_stat(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}
