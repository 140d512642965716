use std::cmp::Ordering;

use crate::models::{
    ConfidenceLevel, FormTrendPrediction, GameweekForecast, PlayerHistory, Trend,
};

/// Number of future gameweeks forecast per player.
pub const FORECAST_HORIZON: u32 = 3;
pub const SMOOTHING_ALPHA: f64 = 0.3;
pub const MAX_PREDICTED_POINTS: f64 = 20.0;

const TREND_WEIGHT: f64 = 0.6;
const MOMENTUM_WEIGHT: f64 = 0.4;
const TREND_SLOPE_THRESHOLD: f64 = 0.3;
const SINGLE_SAMPLE_CONFIDENCE: [f64; 3] = [0.3, 0.2, 0.1];

// ---------------------------------------------------------------------------
// Forecasting
// ---------------------------------------------------------------------------

/// Forecast every player and rank by `trend_strength * momentum`, highest first.
/// Players without any history are skipped.
pub fn forecast_form_trends(
    players: &[PlayerHistory],
    current_gameweek: u32,
) -> Vec<FormTrendPrediction> {
    let mut predictions: Vec<FormTrendPrediction> = players
        .iter()
        .filter_map(|p| forecast_player(p, current_gameweek))
        .collect();

    predictions.sort_by(|a, b| {
        b.rank_score()
            .partial_cmp(&a.rank_score())
            .unwrap_or(Ordering::Equal)
    });

    predictions
}

/// Forecast the next three gameweeks for one player.
///
/// Returns `None` when the player has no history at all.
pub fn forecast_player(player: &PlayerHistory, current_gameweek: u32) -> Option<FormTrendPrediction> {
    let points: Vec<f64> = player.history.iter().map(|s| s.points).collect();
    let gameweeks: Vec<u32> = player.history.iter().map(|s| s.gameweek).collect();

    match points.len() {
        0 => None,
        1 => Some(single_sample_forecast(player, points, gameweeks, current_gameweek)),
        _ => Some(multi_sample_forecast(player, points, gameweeks, current_gameweek)),
    }
}

fn single_sample_forecast(
    player: &PlayerHistory,
    points: Vec<f64>,
    gameweeks: Vec<u32>,
    current_gameweek: u32,
) -> FormTrendPrediction {
    let value = points[0];
    let predicted = clamp_points(value);

    let predicted_form = (1..=FORECAST_HORIZON)
        .zip(SINGLE_SAMPLE_CONFIDENCE)
        .map(|(i, confidence)| GameweekForecast {
            gameweek: current_gameweek.saturating_add(i),
            predicted_points: predicted,
            confidence,
        })
        .collect();

    FormTrendPrediction {
        player_id: player.player_id,
        player_name: player.player_name.clone(),
        team_name: player.team_name.clone(),
        position: player.position.clone(),
        current_form: player.current_form,
        historical_form: points,
        gameweeks,
        predicted_form,
        trend: Trend::Stable,
        trend_strength: 0.0,
        volatility: 0.0,
        momentum: value,
        smoothed_form: value,
        reasoning: vec![
            "Only one gameweek of data available, forecast repeats the last score".to_string(),
        ],
        overall_confidence: ConfidenceLevel::Low,
    }
}

fn multi_sample_forecast(
    player: &PlayerHistory,
    points: Vec<f64>,
    gameweeks: Vec<u32>,
    current_gameweek: u32,
) -> FormTrendPrediction {
    let xs: Vec<f64> = gameweeks.iter().map(|&gw| gw as f64).collect();
    let (slope, intercept) = linear_regression(&xs, &points);
    let volatility = population_std_dev(&points);
    let momentum = weighted_momentum(&points);
    let smoothed_form = exponential_smoothing(&points, SMOOTHING_ALPHA)
        .last()
        .copied()
        .unwrap_or(0.0);

    let stability = (1.0 - volatility / 10.0).max(0.0);
    let predicted_form: Vec<GameweekForecast> = (1..=FORECAST_HORIZON)
        .map(|i| {
            let gameweek = current_gameweek.saturating_add(i);
            let trend_value = slope * gameweek as f64 + intercept;
            GameweekForecast {
                gameweek,
                predicted_points: clamp_points(
                    TREND_WEIGHT * trend_value + MOMENTUM_WEIGHT * momentum,
                ),
                confidence: stability * (1.0 - (i - 1) as f64 * 0.2),
            }
        })
        .collect();

    let avg_confidence = mean(&predicted_form.iter().map(|f| f.confidence).collect::<Vec<_>>());
    let avg_predicted =
        mean(&predicted_form.iter().map(|f| f.predicted_points).collect::<Vec<_>>());

    let reasoning = trend_reasoning(slope, momentum, mean(&points), volatility, avg_predicted);

    FormTrendPrediction {
        player_id: player.player_id,
        player_name: player.player_name.clone(),
        team_name: player.team_name.clone(),
        position: player.position.clone(),
        current_form: player.current_form,
        historical_form: points,
        gameweeks,
        predicted_form,
        trend: classify_trend(slope),
        trend_strength: slope.abs(),
        volatility,
        momentum,
        smoothed_form,
        reasoning,
        overall_confidence: overall_confidence(avg_confidence, volatility),
    }
}

pub fn classify_trend(slope: f64) -> Trend {
    if slope > TREND_SLOPE_THRESHOLD {
        Trend::Rising
    } else if slope < -TREND_SLOPE_THRESHOLD {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

pub fn overall_confidence(avg_confidence: f64, volatility: f64) -> ConfidenceLevel {
    if avg_confidence > 0.7 && volatility < 2.5 {
        ConfidenceLevel::High
    } else if avg_confidence > 0.5 || volatility < 4.0 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Every applicable check contributes; none short-circuits the rest.
fn trend_reasoning(
    slope: f64,
    momentum: f64,
    average: f64,
    volatility: f64,
    avg_predicted: f64,
) -> Vec<String> {
    let mut reasoning = Vec::new();

    if slope > 0.5 {
        reasoning.push(format!("Points trending up by {slope:.1} per gameweek"));
    }
    if slope < -0.5 {
        reasoning.push(format!("Points trending down by {:.1} per gameweek", slope.abs()));
    }
    if momentum > average * 1.2 {
        reasoning.push("Recent returns outpacing the period average".to_string());
    }
    if momentum < average * 0.8 {
        reasoning.push("Recent returns below the period average".to_string());
    }
    if volatility > 4.0 {
        reasoning.push("Highly volatile returns, forecast is uncertain".to_string());
    }
    if volatility < 2.0 {
        reasoning.push("Consistent returns week to week".to_string());
    }
    if avg_predicted > 6.0 {
        reasoning.push(format!("Strong projected returns ({avg_predicted:.1} pts/GW)"));
    }
    if avg_predicted < 3.0 {
        reasoning.push(format!("Low projected returns ({avg_predicted:.1} pts/GW)"));
    }

    if reasoning.is_empty() {
        reasoning.push("Form broadly in line with recent output".to_string());
    }
    reasoning
}

// ---------------------------------------------------------------------------
// Series statistics
// ---------------------------------------------------------------------------

/// Ordinary least squares fit of `ys` against `xs`, returned as (slope, intercept).
///
/// When every x is identical the slope is 0 and the intercept is the mean of `ys`.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return (0.0, 0.0);
    }

    let mean_x = mean(&xs[..n]);
    let mean_y = mean(&ys[..n]);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x) * (x - mean_x);
    }

    if sxx == 0.0 {
        return (0.0, mean_y);
    }

    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x)
}

pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Weighted mean with weight `(i + 1) / n`, so later gameweeks count more.
pub fn weighted_momentum(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (i, v) in values.iter().enumerate() {
        let w = (i as f64 + 1.0) / n;
        weighted += v * w;
        total_weight += w;
    }
    if total_weight == 0.0 {
        return 0.0;
    }
    weighted / total_weight
}

/// Simple exponential smoothing seeded with the first value.
pub fn exponential_smoothing(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut level = match values.first() {
        Some(&v) => v,
        None => return out,
    };
    out.push(level);
    for &v in &values[1..] {
        level = alpha * v + (1.0 - alpha) * level;
        out.push(level);
    }
    out
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn clamp_points(value: f64) -> f64 {
    value.clamp(0.0, MAX_PREDICTED_POINTS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
