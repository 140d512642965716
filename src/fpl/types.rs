use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::parse_stat;

// ---------------------------------------------------------------------------
// bootstrap-static
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub elements: Vec<ApiElement>,
    #[serde(default)]
    pub teams: Vec<ApiTeam>,
    #[serde(default)]
    pub events: Vec<ApiEvent>,
}

/// A player row. Most stats arrive as strings ("5.3"); those fields are
/// parsed leniently and fall back to 0.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiElement {
    pub id: i64,
    #[serde(default)]
    pub web_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    #[serde(default)]
    pub team: i64,
    #[serde(default)]
    pub element_type: u8,
    /// Price in tenths of £m.
    #[serde(default)]
    pub now_cost: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub form: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub selected_by_percent: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ict_index: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub points_per_game: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub expected_goals_per_90: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub expected_assists_per_90: f64,
    #[serde(default)]
    pub transfers_in_event: i64,
    #[serde(default)]
    pub transfers_out_event: i64,
    #[serde(default)]
    pub minutes: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiTeam {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEvent {
    pub id: u32,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
    #[serde(default)]
    pub finished: bool,
}

// ---------------------------------------------------------------------------
// element-summary/{id}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElementSummary {
    #[serde(default)]
    pub history: Vec<ApiHistoryRow>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiHistoryRow {
    pub round: u32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub bonus: u32,
    #[serde(default)]
    pub bps: i32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub expected_goals: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub expected_assists: f64,
}

/// Accept a number, a numeric string, or null. Anything unparseable is 0.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_stat(&s),
        _ => 0.0,
    })
}
