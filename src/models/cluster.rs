use std::fmt;

use serde::{Deserialize, Serialize};

use super::PlayerFeatures;

/// A player's cluster assignment from one k-means run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResult {
    pub player_id: i64,
    pub name: String,
    pub team_name: Option<String>,
    pub cluster: usize,
    pub features: PlayerFeatures,
    /// 0–100, higher when the player sits close to its centroid.
    pub confidence_score: u8,
}

/// A clustered player that passed the differential filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferentialPick {
    #[serde(flatten)]
    pub result: ClusterResult,
    pub reasoning: Vec<String>,
}

/// Qualitative tier assigned to a whole cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterLabel {
    #[serde(rename = "Differentials")]
    Differentials,
    #[serde(rename = "Template Picks")]
    TemplatePicks,
    #[serde(rename = "Avoid")]
    Avoid,
    #[serde(rename = "Mid-tier Options")]
    MidTierOptions,
}

impl ClusterLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterLabel::Differentials => "Differentials",
            ClusterLabel::TemplatePicks => "Template Picks",
            ClusterLabel::Avoid => "Avoid",
            ClusterLabel::MidTierOptions => "Mid-tier Options",
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-cluster averages and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub cluster: usize,
    pub player_count: usize,
    pub avg_form: f64,
    pub avg_ownership: f64,
    pub avg_ict: f64,
    pub label: ClusterLabel,
}
