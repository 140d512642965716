use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::{
    ClusterResult, ClusterSummary, DifferentialPick, FormTrendPrediction, PriceChangePrediction,
};

/// Everything one refresh cycle produced, served read-only to the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSnapshot {
    pub generated_at: DateTime<Utc>,
    pub current_gameweek: u32,
    pub clusters: Vec<ClusterResult>,
    pub cluster_summaries: Vec<ClusterSummary>,
    pub differentials: Vec<DifferentialPick>,
    pub form_trends: Vec<FormTrendPrediction>,
    pub price_changes: Vec<PriceChangePrediction>,
}

/// Shared holder for the latest snapshot. Readers get a cheap `Arc` clone;
/// a failed refresh never clears what is already published.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCache {
    inner: Arc<RwLock<Option<Arc<AnalysisSnapshot>>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn latest(&self) -> Option<Arc<AnalysisSnapshot>> {
        self.inner.read().await.clone()
    }

    pub async fn publish(&self, snapshot: AnalysisSnapshot) {
        *self.inner.write().await = Some(Arc::new(snapshot));
    }
}
