use serde_json::json;

use fpl_insights::api::router::create_router;
use fpl_insights::config::AppConfig;
use fpl_insights::fpl::Bootstrap;
use fpl_insights::models::{PlayerGameweekSample, PlayerHistory};
use fpl_insights::services::SnapshotCache;
use fpl_insights::AppState;

/// Config for tests: no scheduled refresh, default analysis parameters.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        refresh_enabled: false,
        ..AppConfig::default()
    }
}

/// Router wired to `cache` with a recorder that is never installed globally.
#[allow(dead_code)]
pub fn build_test_app(cache: SnapshotCache) -> axum::Router {
    let state = AppState {
        config: test_config(),
        cache,
        metrics_handle: fpl_insights::metrics::detached_handle(),
    };
    create_router(state)
}

/// A small bootstrap-static payload in the upstream wire format (string stats).
///
/// - 1 Mbeumo: low-owned, in form, heavily transferred in.
/// - 2 Salah: template pick, heavily transferred out.
/// - 3 Bench: no minutes, balanced transfers.
/// - 4 Wissa: mid-table, light transfers in.
/// - 5 Raya: poor form keeper.
/// - 6 Isak: low-owned, in form, no net transfers.
#[allow(dead_code)]
pub fn sample_bootstrap() -> Bootstrap {
    let raw = json!({
        "events": [
            { "id": 11, "is_current": false, "is_next": false, "finished": true },
            { "id": 12, "is_current": true, "is_next": false, "finished": false },
            { "id": 13, "is_current": false, "is_next": true, "finished": false }
        ],
        "teams": [
            { "id": 1, "name": "Brentford", "short_name": "BRE" },
            { "id": 2, "name": "Liverpool", "short_name": "LIV" }
        ],
        "elements": [
            element(1, "Mbeumo", 1, 3, 75, "7.2", "8.5", "11.0", "6.1", 0.55, 0.20, 40_000, 1_000, 900),
            element(2, "Salah", 2, 3, 130, "8.0", "60.0", "14.0", "8.0", 0.70, 0.40, 5_000, 20_000, 1_000),
            element(3, "Bench", 1, 2, 40, "0.5", "1.2", "0.0", "0.0", 0.0, 0.0, 10, 10, 0),
            element(4, "Wissa", 2, 4, 60, "3.0", "20.0", "6.0", "3.5", 0.30, 0.10, 100, 50, 500),
            element(5, "Raya", 1, 1, 45, "2.0", "30.0", "4.0", "3.0", 0.0, 0.0, 0, 0, 900),
            element(6, "Isak", 2, 4, 85, "6.5", "25.0", "9.0", "5.8", 0.60, 0.10, 100, 100, 700)
        ]
    });
    serde_json::from_value(raw).expect("fixture bootstrap should parse")
}

#[allow(clippy::too_many_arguments)]
fn element(
    id: i64,
    name: &str,
    team: i64,
    element_type: u8,
    now_cost: i64,
    form: &str,
    selected_by_percent: &str,
    ict_index: &str,
    points_per_game: &str,
    xg90: f64,
    xa90: f64,
    transfers_in: i64,
    transfers_out: i64,
    minutes: u32,
) -> serde_json::Value {
    json!({
        "id": id,
        "web_name": name,
        "team": team,
        "element_type": element_type,
        "now_cost": now_cost,
        "form": form,
        "selected_by_percent": selected_by_percent,
        "ict_index": ict_index,
        "points_per_game": points_per_game,
        "expected_goals_per_90": xg90,
        "expected_assists_per_90": xa90,
        "transfers_in_event": transfers_in,
        "transfers_out_event": transfers_out,
        "minutes": minutes
    })
}

/// Forecaster input with consecutive (gameweek, points) samples.
#[allow(dead_code)]
pub fn sample_history(player_id: i64, name: &str, points: &[(u32, f64)]) -> PlayerHistory {
    PlayerHistory {
        player_id,
        player_name: name.to_string(),
        team_name: Some("Brentford".to_string()),
        position: Some("MID".to_string()),
        current_form: 5.0,
        history: points
            .iter()
            .map(|&(gameweek, pts)| PlayerGameweekSample {
                gameweek,
                points: pts,
                minutes: 90,
                form: 0.0,
                expected_goals: 0.2,
                expected_assists: 0.1,
                bps: 20,
                bonus: 0,
                goals_scored: 0,
                assists: 0,
            })
            .collect(),
    }
}
