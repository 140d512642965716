use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("analysis_requests_total").absolute(0);
    counter!("snapshot_refreshes_total").absolute(0);
    counter!("snapshot_refresh_failures_total").absolute(0);

    // Pre-register gauges at zero.
    gauge!("players_clustered").set(0.0);
    gauge!("differentials_found").set(0.0);

    // Histogram is lazily created on first record; force creation.
    histogram!("snapshot_refresh_seconds").record(0.0);

    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally.
///
/// Renders an empty payload; used where a process-wide recorder already
/// exists or must not be installed (tests, embedded routers).
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
