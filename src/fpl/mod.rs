pub mod client;
pub mod convert;
pub mod types;

pub use client::{FplClient, FplClientError, FPL_API_BASE};
pub use types::{ApiElement, ApiEvent, ApiHistoryRow, ApiTeam, Bootstrap, ElementSummary};
