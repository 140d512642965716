mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use tower::ServiceExt;

use fpl_insights::services::{build_snapshot, SnapshotCache};

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn populated_cache() -> SnapshotCache {
    let cache = SnapshotCache::new();
    let histories = vec![common::sample_history(
        1,
        "Mbeumo",
        &[(9, 2.0), (10, 4.0), (11, 6.0), (12, 8.0)],
    )];
    let snapshot = build_snapshot(
        &common::sample_bootstrap(),
        &histories,
        &common::test_config(),
        Utc::now(),
        &mut StdRng::seed_from_u64(11),
    );
    cache.publish(snapshot).await;
    cache
}

fn player_json(id: i64, form: f64, ownership: f64) -> Value {
    json!({
        "playerId": id,
        "name": format!("Player {id}"),
        "teamName": "Test FC",
        "form": form,
        "ownership": ownership,
        "xgPer90": 0.2,
        "xaPer90": 0.1,
        "ictIndex": 5.0,
        "priceValue": 6.0,
        "pointsPerGame": 4.0
    })
}

// ---------------------------------------------------------------------------
// Health / metrics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_check_before_first_refresh() {
    let app = common::build_test_app(SnapshotCache::new());
    let (status, json) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["snapshot_ready"], false);
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let app = common::build_test_app(SnapshotCache::new());
    let resp = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Cached snapshot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_snapshot_routes_unavailable_before_refresh() {
    for uri in ["/api/differentials", "/api/clusters", "/api/form-trends", "/api/price-changes"] {
        let app = common::build_test_app(SnapshotCache::new());
        let (status, json) = send(app, get(uri)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(json["success"], false);
    }
}

#[tokio::test]
async fn test_snapshot_status_and_lists() {
    let cache = populated_cache().await;

    let (status, json) = send(common::build_test_app(cache.clone()), get("/api/snapshot/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["currentGameweek"], 12);
    assert_eq!(json["data"]["playersClustered"], 5);

    let (status, json) = send(common::build_test_app(cache.clone()), get("/api/clusters?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert!(json["data"][0]["confidenceScore"].is_u64());

    let (_, json) = send(common::build_test_app(cache.clone()), get("/api/clusters/summary")).await;
    assert!(json["data"][0]["label"].is_string());

    let (_, json) = send(common::build_test_app(cache.clone()), get("/api/differentials")).await;
    let picks = json["data"].as_array().unwrap();
    assert_eq!(picks.len(), 2);
    assert!(picks.iter().all(|p| p["reasoning"].is_array()));
}

#[tokio::test]
async fn test_price_changes_direction_filter() {
    let cache = populated_cache().await;

    let (status, json) = send(
        common::build_test_app(cache),
        get("/api/price-changes?direction=fall"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["playerId"], 2);
    assert_eq!(data[0]["priceChangeDirection"], "fall");
    assert_eq!(data[0]["transfersOut24h"], 20_000);
}

#[tokio::test]
async fn test_form_trend_detail_and_missing_player() {
    let cache = populated_cache().await;

    let (status, json) = send(common::build_test_app(cache.clone()), get("/api/form-trends/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["trend"], "rising");
    assert_eq!(json["data"]["predictedForm"].as_array().unwrap().len(), 3);

    let (status, json) = send(common::build_test_app(cache), get("/api/form-trends/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

// ---------------------------------------------------------------------------
// On-demand analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_analyze_differentials_scenario() {
    let app = common::build_test_app(SnapshotCache::new());
    let body = json!({
        "players": [
            player_json(1, 7.0, 5.0),
            player_json(2, 6.0, 40.0),
            player_json(3, 2.0, 60.0),
            player_json(4, 4.5, 15.0)
        ],
        "seed": 42,
        "ownershipThreshold": 35.0,
        "formThreshold": 5.0
    });

    let (status, json) = send(app, post_json("/api/analyze/differentials", body)).await;
    assert_eq!(status, StatusCode::OK);
    let picks = json["data"].as_array().unwrap();
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0]["playerId"], 1);
    assert_eq!(picks[0]["reasoning"][0], "Excellent form");
}

#[tokio::test]
async fn test_analyze_clusters_seeded_and_summarized() {
    let players: Vec<Value> = (0..12)
        .map(|i| player_json(i, (i % 8) as f64, (i * 5 % 70) as f64))
        .collect();
    let body = json!({ "players": players, "k": 3, "seed": 7 });

    let (status, first) = send(
        common::build_test_app(SnapshotCache::new()),
        post_json("/api/analyze/clusters", body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let clusters = first["data"]["clusters"].as_array().unwrap();
    assert_eq!(clusters.len(), 12);
    assert!(clusters.iter().all(|c| c["cluster"].as_u64().unwrap() < 3));
    assert!(!first["data"]["summaries"].as_array().unwrap().is_empty());

    let (_, second) = send(
        common::build_test_app(SnapshotCache::new()),
        post_json("/api/analyze/clusters", body),
    )
    .await;
    assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn test_analyze_clusters_rejects_zero_k() {
    let app = common::build_test_app(SnapshotCache::new());
    let body = json!({ "players": [player_json(1, 5.0, 5.0)], "k": 0 });

    let (status, json) = send(app, post_json("/api/analyze/clusters", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_analyze_clusters_empty_players() {
    let app = common::build_test_app(SnapshotCache::new());
    let (status, json) = send(app, post_json("/api/analyze/clusters", json!({ "players": [] }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["clusters"], json!([]));
}

#[tokio::test]
async fn test_analyze_form_trends_linear_history() {
    let app = common::build_test_app(SnapshotCache::new());
    let body = json!({
        "currentGameweek": 4,
        "players": [{
            "playerId": 10,
            "playerName": "Linear",
            "history": [
                { "gameweek": 1, "points": 2.0 },
                { "gameweek": 2, "points": 4.0 },
                { "gameweek": 3, "points": 6.0 },
                { "gameweek": 4, "points": 8.0 }
            ]
        }]
    });

    let (status, json) = send(app, post_json("/api/analyze/form-trends", body)).await;
    assert_eq!(status, StatusCode::OK);
    let prediction = &json["data"][0];
    assert_eq!(prediction["trend"], "rising");
    assert_eq!(prediction["gameweeks"], json!([1, 2, 3, 4]));
    assert_eq!(prediction["predictedForm"][0]["gameweek"], 5);
    assert_eq!(prediction["predictedForm"][2]["gameweek"], 7);
}

#[tokio::test]
async fn test_analyze_price_changes_scenario() {
    let app = common::build_test_app(SnapshotCache::new());
    let body = json!({
        "currentGameweek": 3,
        "today": "2024-08-20",
        "players": [{
            "playerId": 1,
            "playerName": "Riser",
            "currentPrice": 50.0,
            "transfersIn": 10000,
            "transfersOut": 0,
            "ownership": 5.0,
            "form": 6.0
        }]
    });

    let (status, json) = send(app, post_json("/api/analyze/price-changes", body)).await;
    assert_eq!(status, StatusCode::OK);
    let prediction = &json["data"][0];
    assert_eq!(prediction["priceChangeDirection"], "rise");
    assert!(prediction["probability"].as_f64().unwrap() > 80.0);
    assert_eq!(prediction["confidence"], "high");
    assert_eq!(prediction["expectedChangeDate"], "2024-08-21");
}

#[tokio::test]
async fn test_analyze_form_trends_last_representable_gameweek() {
    let app = common::build_test_app(SnapshotCache::new());
    let body = json!({
        "currentGameweek": u32::MAX,
        "players": [{
            "playerId": 10,
            "playerName": "Late",
            "history": [
                { "gameweek": 1, "points": 2.0 },
                { "gameweek": 2, "points": 4.0 }
            ]
        }]
    });

    let (status, json) = send(app, post_json("/api/analyze/form-trends", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["predictedForm"][0]["gameweek"], u32::MAX);
}

#[tokio::test]
async fn test_analyze_price_changes_rejects_negative_transfers() {
    let app = common::build_test_app(SnapshotCache::new());
    let body = json!({
        "currentGameweek": 15,
        "players": [{
            "playerId": 1,
            "playerName": "Broken",
            "currentPrice": 5.0,
            "transfersIn": i64::MAX,
            "transfersOut": -1,
            "ownership": 5.0
        }]
    });

    let (status, json) = send(app, post_json("/api/analyze/price-changes", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_analyze_price_changes_clamps_ownership() {
    let app = common::build_test_app(SnapshotCache::new());
    let body = json!({
        "currentGameweek": 15,
        "today": "2024-11-20",
        "minProbability": -1.0,
        "players": [{
            "playerId": 1,
            "playerName": "Odd",
            "currentPrice": 5.0,
            "transfersIn": 100,
            "transfersOut": 0,
            "ownership": -10.0
        }]
    });

    let (status, json) = send(app, post_json("/api/analyze/price-changes", body)).await;
    assert_eq!(status, StatusCode::OK);
    let prediction = &json["data"][0];
    assert_eq!(prediction["ownership"], 0.0);
    let probability = prediction["probability"].as_f64().unwrap();
    assert!((0.0..=95.0).contains(&probability));
}
