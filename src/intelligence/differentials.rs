use std::cmp::Ordering;

use crate::models::{ClusterResult, DifferentialPick, PlayerFeatures};

pub const DEFAULT_OWNERSHIP_THRESHOLD: f64 = 35.0;
pub const DEFAULT_FORM_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialConfig {
    /// Players must be owned by strictly fewer managers than this (percent).
    pub ownership_threshold: f64,
    /// Players must have strictly higher form than this.
    pub form_threshold: f64,
}

impl Default for DifferentialConfig {
    fn default() -> Self {
        Self {
            ownership_threshold: DEFAULT_OWNERSHIP_THRESHOLD,
            form_threshold: DEFAULT_FORM_THRESHOLD,
        }
    }
}

type Rule = (fn(&PlayerFeatures) -> bool, &'static str);

/// Form tiers, highest first. Only the first match contributes.
const FORM_TIERS: &[Rule] = &[
    (|p: &PlayerFeatures| p.form > 6.5, "Excellent form"),
    (|p: &PlayerFeatures| p.form > 5.5, "Good form"),
];

/// Independent stat checks, each contributing when true.
const STAT_RULES: &[Rule] = &[
    (|p: &PlayerFeatures| p.xg_per_90 > 0.5, "High goal threat (xG/90)"),
    (|p: &PlayerFeatures| p.xa_per_90 > 0.3, "Strong creativity (xA/90)"),
    (|p: &PlayerFeatures| p.ict_index > 10.0, "High ICT index"),
    (|p: &PlayerFeatures| p.price_value > 7.0, "Premium-priced asset"),
];

/// Ownership tiers, lowest first. Only the first match contributes.
const OWNERSHIP_TIERS: &[Rule] = &[
    (|p: &PlayerFeatures| p.ownership < 10.0, "Very low ownership"),
    (|p: &PlayerFeatures| p.ownership < 20.0, "Low ownership"),
];

/// Filter clustered players down to low-owned, in-form picks, best first.
///
/// Ranking uses `form * confidence / 100`; equal scores keep input order.
pub fn identify_differentials(
    results: &[ClusterResult],
    cfg: DifferentialConfig,
) -> Vec<DifferentialPick> {
    let mut picks: Vec<DifferentialPick> = results
        .iter()
        .filter(|r| {
            r.features.ownership < cfg.ownership_threshold && r.features.form > cfg.form_threshold
        })
        .map(|r| DifferentialPick {
            result: r.clone(),
            reasoning: build_reasoning(&r.features),
        })
        .collect();

    picks.sort_by(|a, b| {
        differential_score(&b.result)
            .partial_cmp(&differential_score(&a.result))
            .unwrap_or(Ordering::Equal)
    });

    picks
}

pub fn differential_score(result: &ClusterResult) -> f64 {
    result.features.form * (result.confidence_score as f64 / 100.0)
}

/// Reasoning in fixed order: form tier, stat checks, ownership tier.
pub fn build_reasoning(features: &PlayerFeatures) -> Vec<String> {
    let mut reasoning = Vec::new();

    if let Some(label) = first_match(FORM_TIERS, features) {
        reasoning.push(label.to_string());
    }
    for (check, label) in STAT_RULES {
        if check(features) {
            reasoning.push(label.to_string());
        }
    }
    if let Some(label) = first_match(OWNERSHIP_TIERS, features) {
        reasoning.push(label.to_string());
    }

    reasoning
}

fn first_match(rules: &[Rule], features: &PlayerFeatures) -> Option<&'static str> {
    rules
        .iter()
        .find(|(check, _)| check(features))
        .map(|(_, label)| *label)
}
