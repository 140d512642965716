pub mod cache;
pub mod refresher;

pub use cache::{AnalysisSnapshot, SnapshotCache};
pub use refresher::{build_snapshot, refresh_once, run_analysis_refresher};
