use std::collections::HashMap;

use super::types::{ApiElement, ApiEvent, ApiHistoryRow, ApiTeam, Bootstrap};
use crate::models::{PlayerFeatures, PlayerGameweekSample, PlayerHistory, PlayerTransferStats};

/// Short position code for an FPL `element_type`.
pub fn position_label(element_type: u8) -> Option<&'static str> {
    match element_type {
        1 => Some("GKP"),
        2 => Some("DEF"),
        3 => Some("MID"),
        4 => Some("FWD"),
        _ => None,
    }
}

/// The gameweek in progress: the event flagged current, else the last
/// finished one, else 1 before the season starts.
pub fn current_gameweek(events: &[ApiEvent]) -> u32 {
    events
        .iter()
        .find(|e| e.is_current)
        .or_else(|| events.iter().filter(|e| e.finished).max_by_key(|e| e.id))
        .map(|e| e.id)
        .unwrap_or(1)
}

pub fn team_names(teams: &[ApiTeam]) -> HashMap<i64, String> {
    teams.iter().map(|t| (t.id, t.name.clone())).collect()
}

fn display_name(element: &ApiElement) -> String {
    if !element.web_name.is_empty() {
        return element.web_name.clone();
    }
    format!("{} {}", element.first_name, element.second_name)
        .trim()
        .to_string()
}

fn price(element: &ApiElement) -> f64 {
    element.now_cost as f64 / 10.0
}

pub fn to_features(element: &ApiElement, teams: &HashMap<i64, String>) -> PlayerFeatures {
    PlayerFeatures {
        player_id: element.id,
        name: display_name(element),
        team_name: teams.get(&element.team).cloned(),
        form: element.form,
        ownership: element.selected_by_percent,
        xg_per_90: element.expected_goals_per_90,
        xa_per_90: element.expected_assists_per_90,
        ict_index: element.ict_index,
        price_value: price(element),
        points_per_game: element.points_per_game,
    }
    .sanitized()
}

pub fn to_transfer_stats(element: &ApiElement, teams: &HashMap<i64, String>) -> PlayerTransferStats {
    PlayerTransferStats {
        player_id: element.id,
        player_name: display_name(element),
        team_name: teams.get(&element.team).cloned(),
        position: position_label(element.element_type).map(str::to_string),
        current_price: price(element),
        transfers_in: element.transfers_in_event,
        transfers_out: element.transfers_out_event,
        ownership: element.selected_by_percent,
        form: element.form,
    }
}

pub fn to_sample(row: &ApiHistoryRow) -> PlayerGameweekSample {
    PlayerGameweekSample {
        gameweek: row.round,
        points: row.total_points as f64,
        minutes: row.minutes,
        form: 0.0,
        expected_goals: row.expected_goals,
        expected_assists: row.expected_assists,
        bps: row.bps,
        bonus: row.bonus,
        goals_scored: row.goals_scored,
        assists: row.assists,
    }
}

/// Build a forecaster input from the last `window` gameweeks of history.
///
/// Double gameweeks produce two rows with the same round; they are merged
/// so each gameweek appears once with its combined points.
pub fn to_history(
    element: &ApiElement,
    teams: &HashMap<i64, String>,
    rows: &[ApiHistoryRow],
    window: usize,
) -> PlayerHistory {
    let mut samples: Vec<PlayerGameweekSample> = Vec::new();
    let mut sorted: Vec<&ApiHistoryRow> = rows.iter().collect();
    sorted.sort_by_key(|r| r.round);

    for row in sorted {
        let sample = to_sample(row);
        match samples.last_mut() {
            Some(last) if last.gameweek == sample.gameweek => {
                last.points += sample.points;
                last.minutes += sample.minutes;
                last.expected_goals += sample.expected_goals;
                last.expected_assists += sample.expected_assists;
                last.bps += sample.bps;
                last.bonus += sample.bonus;
                last.goals_scored += sample.goals_scored;
                last.assists += sample.assists;
            }
            _ => samples.push(sample),
        }
    }

    // Rolling form: mean points over the last four gameweeks up to each row.
    let forms: Vec<f64> = (0..samples.len())
        .map(|i| {
            let slice = &samples[i.saturating_sub(3)..=i];
            slice.iter().map(|s| s.points).sum::<f64>() / slice.len() as f64
        })
        .collect();
    for (sample, form) in samples.iter_mut().zip(forms) {
        sample.form = form;
    }

    let start = samples.len().saturating_sub(window);
    let history = samples.split_off(start);

    PlayerHistory {
        player_id: element.id,
        player_name: display_name(element),
        team_name: teams.get(&element.team).cloned(),
        position: position_label(element.element_type).map(str::to_string),
        current_form: element.form,
        history,
    }
}

/// Players who have featured this season, as clustering input.
pub fn features_from_bootstrap(bootstrap: &Bootstrap) -> Vec<PlayerFeatures> {
    let teams = team_names(&bootstrap.teams);
    bootstrap
        .elements
        .iter()
        .filter(|e| e.minutes > 0)
        .map(|e| to_features(e, &teams))
        .collect()
}

pub fn transfer_stats_from_bootstrap(bootstrap: &Bootstrap) -> Vec<PlayerTransferStats> {
    let teams = team_names(&bootstrap.teams);
    bootstrap
        .elements
        .iter()
        .map(|e| to_transfer_stats(e, &teams))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: u32, is_current: bool, finished: bool) -> ApiEvent {
        ApiEvent {
            id,
            is_current,
            is_next: false,
            finished,
        }
    }

    fn row(round: u32, points: i32) -> ApiHistoryRow {
        ApiHistoryRow {
            round,
            total_points: points,
            minutes: 90,
            goals_scored: 0,
            assists: 0,
            bonus: 0,
            bps: 10,
            expected_goals: 0.1,
            expected_assists: 0.0,
        }
    }

    fn element() -> ApiElement {
        serde_json::from_str(
            r#"{"id": 5, "web_name": "Palmer", "team": 2, "element_type": 3,
                "now_cost": 105, "form": "7.5", "selected_by_percent": "22.0", "minutes": 900}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_current_gameweek_resolution() {
        assert_eq!(current_gameweek(&[event(1, false, true), event(2, true, false)]), 2);
        assert_eq!(current_gameweek(&[event(1, false, true), event(2, false, true), event(3, false, false)]), 2);
        assert_eq!(current_gameweek(&[event(1, false, false)]), 1);
        assert_eq!(current_gameweek(&[]), 1);
    }

    #[test]
    fn test_position_labels() {
        assert_eq!(position_label(1), Some("GKP"));
        assert_eq!(position_label(4), Some("FWD"));
        assert_eq!(position_label(9), None);
    }

    #[test]
    fn test_to_features_joins_team_and_price() {
        let teams = HashMap::from([(2, "Chelsea".to_string())]);
        let features = to_features(&element(), &teams);
        assert_eq!(features.team_name.as_deref(), Some("Chelsea"));
        assert_eq!(features.price_value, 10.5);
        assert_eq!(features.form, 7.5);
        assert_eq!(features.ownership, 22.0);
    }

    #[test]
    fn test_to_history_merges_double_gameweeks_and_windows() {
        let rows = vec![row(3, 2), row(1, 6), row(2, 1), row(3, 5), row(4, 8)];
        let history = to_history(&element(), &HashMap::new(), &rows, 3);

        let gws: Vec<u32> = history.history.iter().map(|s| s.gameweek).collect();
        let pts: Vec<f64> = history.history.iter().map(|s| s.points).collect();
        assert_eq!(gws, vec![2, 3, 4]);
        assert_eq!(pts, vec![1.0, 7.0, 8.0]);
        assert_eq!(history.history[1].minutes, 180);
        assert_eq!(history.position.as_deref(), Some("MID"));
        assert_eq!(history.current_form, 7.5);
    }
}
