pub mod cluster_stats;
pub mod differentials;
pub mod form_trend;
pub mod kmeans;
pub mod normalizer;
pub mod price_change;

pub use cluster_stats::{label_cluster, summarize_clusters};
pub use differentials::{identify_differentials, DifferentialConfig};
pub use form_trend::{forecast_form_trends, forecast_player};
pub use kmeans::{cluster_players, KMeansConfig};
pub use normalizer::normalize_features;
pub use price_change::{estimate_price_change, estimate_price_changes};
