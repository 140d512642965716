use std::env;
use std::str::FromStr;

use crate::fpl::FPL_API_BASE;
use crate::intelligence::differentials::{DEFAULT_FORM_THRESHOLD, DEFAULT_OWNERSHIP_THRESHOLD};
use crate::intelligence::kmeans::{DEFAULT_CLUSTERS, DEFAULT_MAX_ITERATIONS};
use crate::intelligence::price_change::DEFAULT_MIN_PROBABILITY;
use crate::intelligence::{DifferentialConfig, KMeansConfig};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Data source
    pub fpl_api_base: String,

    // Scheduled refresh
    pub refresh_enabled: bool,
    pub refresh_interval_secs: u64,
    pub forecast_player_limit: usize,
    pub forecast_history_window: usize,
    pub history_fetch_concurrency: usize,

    // Analysis parameters
    pub kmeans_clusters: usize,
    pub kmeans_max_iterations: usize,
    pub differential_ownership_threshold: f64,
    pub differential_form_threshold: f64,
    pub price_min_probability: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            fpl_api_base: FPL_API_BASE.into(),
            refresh_enabled: true,
            refresh_interval_secs: 4 * 60 * 60,
            forecast_player_limit: 50,
            forecast_history_window: 6,
            history_fetch_concurrency: 8,
            kmeans_clusters: DEFAULT_CLUSTERS,
            kmeans_max_iterations: DEFAULT_MAX_ITERATIONS,
            differential_ownership_threshold: DEFAULT_OWNERSHIP_THRESHOLD,
            differential_form_threshold: DEFAULT_FORM_THRESHOLD,
            price_min_probability: DEFAULT_MIN_PROBABILITY,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let d = Self::default();

        let cfg = Self {
            host: env::var("HOST").unwrap_or(d.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| d.port.to_string())
                .parse()?,
            fpl_api_base: env::var("FPL_API_BASE").unwrap_or(d.fpl_api_base),
            refresh_enabled: env_or("REFRESH_ENABLED", d.refresh_enabled),
            refresh_interval_secs: env_or("REFRESH_INTERVAL_SECS", d.refresh_interval_secs).max(60),
            forecast_player_limit: env_or("FORECAST_PLAYER_LIMIT", d.forecast_player_limit),
            forecast_history_window: env_or("FORECAST_HISTORY_WINDOW", d.forecast_history_window)
                .max(1),
            history_fetch_concurrency: env_or(
                "HISTORY_FETCH_CONCURRENCY",
                d.history_fetch_concurrency,
            )
            .max(1),
            kmeans_clusters: env_or("KMEANS_CLUSTERS", d.kmeans_clusters),
            kmeans_max_iterations: env_or("KMEANS_MAX_ITERATIONS", d.kmeans_max_iterations),
            differential_ownership_threshold: env_or(
                "DIFFERENTIAL_OWNERSHIP_THRESHOLD",
                d.differential_ownership_threshold,
            ),
            differential_form_threshold: env_or(
                "DIFFERENTIAL_FORM_THRESHOLD",
                d.differential_form_threshold,
            ),
            price_min_probability: env_or("PRICE_MIN_PROBABILITY", d.price_min_probability),
        };

        if cfg.kmeans_clusters == 0 {
            anyhow::bail!("KMEANS_CLUSTERS must be at least 1");
        }
        Ok(cfg)
    }

    pub fn kmeans(&self) -> KMeansConfig {
        KMeansConfig {
            k: self.kmeans_clusters,
            max_iterations: self.kmeans_max_iterations,
        }
    }

    pub fn differentials(&self) -> DifferentialConfig {
        DifferentialConfig {
            ownership_threshold: self.differential_ownership_threshold,
            form_threshold: self.differential_form_threshold,
        }
    }
}

/// Parse an env var, keeping `default` when it is unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
