use std::collections::BTreeMap;

use crate::models::{ClusterLabel, ClusterResult, ClusterSummary};

/// Cluster label rules, checked top to bottom; the first match wins.
/// Arguments are (avg_form, avg_ownership).
const LABEL_RULES: &[(fn(f64, f64) -> bool, ClusterLabel)] = &[
    (|form: f64, ownership: f64| form > 5.0 && ownership < 25.0, ClusterLabel::Differentials),
    (|form: f64, ownership: f64| form > 5.0 && ownership > 50.0, ClusterLabel::TemplatePicks),
    (|form: f64, _: f64| form < 3.0, ClusterLabel::Avoid),
];

/// Average form/ownership/ICT per cluster, ordered by cluster index.
pub fn summarize_clusters(results: &[ClusterResult]) -> Vec<ClusterSummary> {
    let mut groups: BTreeMap<usize, Vec<&ClusterResult>> = BTreeMap::new();
    for result in results {
        groups.entry(result.cluster).or_default().push(result);
    }

    groups
        .into_iter()
        .map(|(cluster, members)| {
            let n = members.len() as f64;
            let avg_form = members.iter().map(|r| r.features.form).sum::<f64>() / n;
            let avg_ownership = members.iter().map(|r| r.features.ownership).sum::<f64>() / n;
            let avg_ict = members.iter().map(|r| r.features.ict_index).sum::<f64>() / n;

            ClusterSummary {
                cluster,
                player_count: members.len(),
                avg_form,
                avg_ownership,
                avg_ict,
                label: label_cluster(avg_form, avg_ownership),
            }
        })
        .collect()
}

pub fn label_cluster(avg_form: f64, avg_ownership: f64) -> ClusterLabel {
    LABEL_RULES
        .iter()
        .find(|(rule, _)| rule(avg_form, avg_ownership))
        .map(|(_, label)| *label)
        .unwrap_or(ClusterLabel::MidTierOptions)
}
