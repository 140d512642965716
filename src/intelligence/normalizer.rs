use crate::models::{PlayerFeatures, FEATURE_COUNT};

/// A player's feature vector with every coordinate mapped onto [0, 1].
pub type NormalizedVector = [f64; FEATURE_COUNT];

/// Min-max normalize each feature column across `players`.
///
/// A column whose values are all equal maps to 0 for every player rather
/// than dividing by zero. Output order matches input order.
pub fn normalize_features(players: &[PlayerFeatures]) -> Vec<NormalizedVector> {
    if players.is_empty() {
        return Vec::new();
    }

    let raw: Vec<NormalizedVector> = players.iter().map(PlayerFeatures::vector).collect();

    let mut mins = [f64::INFINITY; FEATURE_COUNT];
    let mut maxs = [f64::NEG_INFINITY; FEATURE_COUNT];
    for row in &raw {
        for (j, &value) in row.iter().enumerate() {
            mins[j] = mins[j].min(value);
            maxs[j] = maxs[j].max(value);
        }
    }

    raw.into_iter()
        .map(|row| {
            let mut out = [0.0; FEATURE_COUNT];
            for (j, value) in row.into_iter().enumerate() {
                let range = maxs[j] - mins[j];
                out[j] = if range == 0.0 {
                    0.0
                } else {
                    (value - mins[j]) / range
                };
            }
            out
        })
        .collect()
}
