pub mod cluster;
pub mod player;
pub mod prediction;

pub use cluster::{ClusterLabel, ClusterResult, ClusterSummary, DifferentialPick};
pub use player::{
    finite_or_zero, parse_stat, PlayerFeatures, PlayerGameweekSample, PlayerHistory,
    PlayerTransferStats, FEATURE_COUNT, FEATURE_NAMES,
};
pub use prediction::{
    ConfidenceLevel, FormTrendPrediction, GameweekForecast, PriceChangePrediction,
    PriceDirection, Trend, UNLIKELY_CHANGE,
};
