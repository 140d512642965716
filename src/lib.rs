pub mod api;
pub mod config;
pub mod errors;
pub mod fpl;
pub mod intelligence;
pub mod metrics;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::services::SnapshotCache;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub cache: SnapshotCache,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
