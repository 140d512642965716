use fpl_insights::api::router::create_router;
use fpl_insights::config::AppConfig;
use fpl_insights::fpl::FplClient;
use fpl_insights::services::{run_analysis_refresher, SnapshotCache};
use fpl_insights::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = fpl_insights::metrics::init_metrics()?;
    let cache = SnapshotCache::new();

    // --- Scheduled refresh: FPL API → analyses → snapshot cache ---
    if config.refresh_enabled {
        let client = FplClient::new(reqwest::Client::new(), config.fpl_api_base.clone());
        let refresher_cache = cache.clone();
        let refresher_config = config.clone();
        tokio::spawn(async move {
            run_analysis_refresher(client, refresher_cache, refresher_config).await;
        });
        tracing::info!(
            api_base = %config.fpl_api_base,
            k = config.kmeans_clusters,
            "Analysis refresher spawned"
        );
    } else {
        tracing::info!("Analysis refresher disabled (REFRESH_ENABLED=false)");
    }

    let state = AppState {
        config,
        cache,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}
