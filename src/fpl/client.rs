use reqwest::Client;
use thiserror::Error;

use super::types::{Bootstrap, ElementSummary};

pub const FPL_API_BASE: &str = "https://fantasy.premierleague.com/api";

#[derive(Debug, Error)]
pub enum FplClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Read-only client for the public Fantasy Premier League API.
#[derive(Debug, Clone)]
pub struct FplClient {
    http: Client,
    base_url: String,
}

impl FplClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch players, teams and gameweeks in one call.
    pub async fn get_bootstrap(&self) -> Result<Bootstrap, FplClientError> {
        let url = format!("{}/bootstrap-static/", self.base_url);
        let resp = self.http.get(&url).send().await?.error_for_status()?;

        let bootstrap: Bootstrap = resp.json().await?;
        if bootstrap.elements.is_empty() {
            return Err(FplClientError::Unexpected(
                "bootstrap-static returned no players".into(),
            ));
        }
        Ok(bootstrap)
    }

    /// Fetch a player's per-gameweek history for the current season.
    pub async fn get_element_summary(&self, element_id: i64) -> Result<ElementSummary, FplClientError> {
        let url = format!("{}/element-summary/{}/", self.base_url, element_id);
        let resp = self.http.get(&url).send().await?.error_for_status()?;

        let summary: ElementSummary = resp.json().await?;
        Ok(summary)
    }
}
