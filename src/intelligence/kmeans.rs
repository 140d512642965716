use rand::seq::index;
use rand::Rng;

use super::normalizer::{normalize_features, NormalizedVector};
use crate::models::{ClusterResult, PlayerFeatures, FEATURE_COUNT};

pub const DEFAULT_CLUSTERS: usize = 4;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansConfig {
    pub k: usize,
    pub max_iterations: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_CLUSTERS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Outcome of Lloyd's iteration over normalized vectors.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    pub centroids: Vec<NormalizedVector>,
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Clustering entry point
// ---------------------------------------------------------------------------

/// Group players into `cfg.k` tiers.
///
/// Centroids are seeded from distinct players drawn with `rng`, so identical
/// input can produce different cluster indices between calls unless the
/// caller passes a seeded generator. Results keep the input order.
pub fn cluster_players<R: Rng + ?Sized>(
    players: &[PlayerFeatures],
    cfg: KMeansConfig,
    rng: &mut R,
) -> Vec<ClusterResult> {
    if players.is_empty() {
        return Vec::new();
    }

    let points = normalize_features(players);
    let fit = fit(&points, cfg, rng);

    tracing::debug!(
        players = players.len(),
        k = fit.centroids.len(),
        iterations = fit.iterations,
        converged = fit.converged,
        "k-means finished"
    );

    players
        .iter()
        .zip(points.iter())
        .zip(fit.assignments.iter())
        .map(|((player, point), &cluster)| {
            let distance = euclidean_distance(point, &fit.centroids[cluster]);
            ClusterResult {
                player_id: player.player_id,
                name: player.name.clone(),
                team_name: player.team_name.clone(),
                cluster,
                features: player.clone(),
                confidence_score: confidence_score(distance),
            }
        })
        .collect()
}

/// Run k-means over already-normalized points.
///
/// `k` is capped to the number of points (and raised to 1), so every
/// returned assignment indexes into `centroids`.
pub fn fit<R: Rng + ?Sized>(points: &[NormalizedVector], cfg: KMeansConfig, rng: &mut R) -> KMeansFit {
    if points.is_empty() {
        return KMeansFit {
            centroids: Vec::new(),
            assignments: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    let k = cfg.k.clamp(1, points.len());
    let mut centroids: Vec<NormalizedVector> = index::sample(rng, points.len(), k)
        .into_iter()
        .map(|i| points[i])
        .collect();

    let mut assignments = assign_points(points, &centroids);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < cfg.max_iterations {
        iterations += 1;
        centroids = update_centroids(points, &assignments, &centroids);
        let next = assign_points(points, &centroids);
        if next == assignments {
            converged = true;
            break;
        }
        assignments = next;
    }

    KMeansFit {
        centroids,
        assignments,
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Lloyd steps
// ---------------------------------------------------------------------------

/// Index of the nearest centroid for every point. Ties go to the lowest index.
pub fn assign_points(points: &[NormalizedVector], centroids: &[NormalizedVector]) -> Vec<usize> {
    points
        .iter()
        .map(|point| nearest_centroid(point, centroids))
        .collect()
}

fn nearest_centroid(point: &NormalizedVector, centroids: &[NormalizedVector]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = euclidean_distance(point, centroid);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    best
}

/// Coordinate-wise mean of each cluster. Empty clusters keep their old centroid.
fn update_centroids(
    points: &[NormalizedVector],
    assignments: &[usize],
    previous: &[NormalizedVector],
) -> Vec<NormalizedVector> {
    let mut sums = vec![[0.0; FEATURE_COUNT]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (point, &cluster) in points.iter().zip(assignments) {
        counts[cluster] += 1;
        for (sum, value) in sums[cluster].iter_mut().zip(point) {
            *sum += value;
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((sum, count), prev)| {
            if count == 0 {
                return *prev;
            }
            let mut mean = sum;
            for v in mean.iter_mut() {
                *v /= count as f64;
            }
            mean
        })
        .collect()
}

pub fn euclidean_distance(a: &NormalizedVector, b: &NormalizedVector) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// `(1 - distance) * 100`, clamped to 0–100 and rounded.
///
/// Distances in the unit hypercube reach sqrt(7), so far-off players
/// bottom out at 0.
pub fn confidence_score(distance: f64) -> u8 {
    ((1.0 - distance) * 100.0).clamp(0.0, 100.0).round() as u8
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player(id: i64, form: f64, ownership: f64, ict: f64) -> PlayerFeatures {
        PlayerFeatures {
            player_id: id,
            name: format!("Player {id}"),
            team_name: Some("Test FC".into()),
            form,
            ownership,
            xg_per_90: form / 20.0,
            xa_per_90: 0.1,
            ict_index: ict,
            price_value: 5.0 + form / 2.0,
            points_per_game: form * 0.8,
        }
    }

    fn spread_players(n: i64) -> Vec<PlayerFeatures> {
        (0..n)
            .map(|i| {
                let f = (i * 37 % 100) as f64 / 10.0;
                player(i, f, (i * 13 % 60) as f64, (i * 7 % 25) as f64)
            })
            .collect()
    }

    #[test]
    fn test_cluster_empty_input() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(cluster_players(&[], KMeansConfig::default(), &mut rng).is_empty());
    }

    #[test]
    fn test_cluster_returns_one_result_per_player_in_order() {
        let players = spread_players(50);
        let mut rng = StdRng::seed_from_u64(7);
        let results = cluster_players(&players, KMeansConfig::default(), &mut rng);

        assert_eq!(results.len(), players.len());
        for (result, player) in results.iter().zip(&players) {
            assert_eq!(result.player_id, player.player_id);
            assert!(result.cluster < DEFAULT_CLUSTERS);
            assert!(result.confidence_score <= 100);
        }
    }

    #[test]
    fn test_cluster_single_player_more_clusters_than_points() {
        let players = vec![player(1, 6.0, 10.0, 8.0)];
        let mut rng = StdRng::seed_from_u64(3);
        let results = cluster_players(&players, KMeansConfig::default(), &mut rng);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].cluster, 0);
        // Sole player is its own centroid.
        assert_eq!(results[0].confidence_score, 100);
    }

    #[test]
    fn test_cluster_terminates_within_max_iterations() {
        let players = spread_players(40);
        let points = normalize_features(&players);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let cfg = KMeansConfig { k: 3, max_iterations: 5 };
            let fit = fit(&points, cfg, &mut rng);
            assert!(fit.iterations <= 5);
            assert_eq!(fit.assignments.len(), 40);
            assert!(fit.assignments.iter().all(|&c| c < 3));
        }
    }

    #[test]
    fn test_zero_iterations_still_assigns() {
        let players = spread_players(10);
        let mut rng = StdRng::seed_from_u64(11);
        let cfg = KMeansConfig { k: 2, max_iterations: 0 };
        let results = cluster_players(&players, cfg, &mut rng);
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|r| r.cluster < 2));
    }

    #[test]
    fn test_converged_assignment_is_fixed_point() {
        let players = spread_players(60);
        let points = normalize_features(&players);
        let mut rng = StdRng::seed_from_u64(42);
        let fit = fit(&points, KMeansConfig::default(), &mut rng);

        assert!(fit.converged);
        assert_eq!(assign_points(&points, &fit.centroids), fit.assignments);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let players = spread_players(30);
        let a = cluster_players(&players, KMeansConfig::default(), &mut StdRng::seed_from_u64(9));
        let b = cluster_players(&players, KMeansConfig::default(), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_separated_groups_split_for_any_seed() {
        let mut players = Vec::new();
        for id in 0..3 {
            players.push(player(id, 8.0, 5.0, 15.0));
        }
        for id in 3..6 {
            players.push(player(id, 1.0, 60.0, 2.0));
        }

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let results = cluster_players(&players, KMeansConfig { k: 2, max_iterations: 100 }, &mut rng);
            let high = results[0].cluster;
            let low = results[3].cluster;
            assert_ne!(high, low, "seed {seed} merged the groups");
            assert!(results[..3].iter().all(|r| r.cluster == high));
            assert!(results[3..].iter().all(|r| r.cluster == low));
            assert!(results.iter().all(|r| r.confidence_score == 100));
        }
    }

    #[test]
    fn test_confidence_score_clamps() {
        assert_eq!(confidence_score(0.0), 100);
        assert_eq!(confidence_score(0.256), 74);
        assert_eq!(confidence_score(1.0), 0);
        assert_eq!(confidence_score(7f64.sqrt()), 0);
    }
}
