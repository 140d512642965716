use std::cmp::Ordering;

use chrono::{Days, NaiveDate};

use crate::models::{
    ConfidenceLevel, PlayerTransferStats, PriceChangePrediction, PriceDirection, UNLIKELY_CHANGE,
};

pub const MAX_PROBABILITY: f64 = 95.0;
pub const STABLE_PROBABILITY: f64 = 5.0;
/// Predictions at or below this probability are dropped from ranked output.
pub const DEFAULT_MIN_PROBABILITY: f64 = 30.0;

const EARLY_SEASON_GAMEWEEK: u32 = 10;
const EARLY_SEASON_MULTIPLIER: f64 = 1.3;

/// Net transfers needed for a price move, scaled by ownership and eased early
/// in the season.
pub fn adjusted_threshold(ownership: f64, gameweek: u32) -> f64 {
    let base = 50.0 + ownership * 20.0;
    let season_multiplier = if gameweek < EARLY_SEASON_GAMEWEEK {
        EARLY_SEASON_MULTIPLIER
    } else {
        1.0
    };
    base / season_multiplier
}

/// Estimate price-change probabilities, keep those above `min_probability`
/// and sort by probability, highest first.
pub fn estimate_price_changes(
    players: &[PlayerTransferStats],
    gameweek: u32,
    today: NaiveDate,
    min_probability: f64,
) -> Vec<PriceChangePrediction> {
    let mut predictions: Vec<PriceChangePrediction> = players
        .iter()
        .map(|p| estimate_price_change(p, gameweek, today))
        .filter(|p| p.probability > min_probability)
        .collect();

    predictions.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });

    predictions
}

/// Estimate one player's price move from the current transfer window.
pub fn estimate_price_change(
    player: &PlayerTransferStats,
    gameweek: u32,
    today: NaiveDate,
) -> PriceChangePrediction {
    let net = player.transfers_in.saturating_sub(player.transfers_out);
    let threshold = adjusted_threshold(player.ownership.clamp(0.0, 100.0), gameweek);

    let (direction, probability) = match net.cmp(&0) {
        Ordering::Greater => {
            let raw = net as f64 / threshold * 100.0;
            (PriceDirection::Rise, (raw * rise_form_boost(player.form)).clamp(0.0, MAX_PROBABILITY))
        }
        Ordering::Less => {
            let raw = net.unsigned_abs() as f64 / threshold * 100.0;
            (PriceDirection::Fall, (raw * fall_form_boost(player.form)).clamp(0.0, MAX_PROBABILITY))
        }
        Ordering::Equal => (PriceDirection::Stable, STABLE_PROBABILITY),
    };

    PriceChangePrediction {
        player_id: player.player_id,
        player_name: player.player_name.clone(),
        team_name: player.team_name.clone(),
        position: player.position.clone(),
        current_price: player.current_price,
        price_change_direction: direction,
        probability,
        transfers_in_24h: player.transfers_in,
        transfers_out_24h: player.transfers_out,
        transfer_delta: net,
        ownership: player.ownership,
        form: player.form,
        reasoning: price_reasoning(player, net, threshold, gameweek),
        expected_change_date: expected_change_date(probability, today),
        confidence: probability_confidence(probability),
    }
}

fn rise_form_boost(form: f64) -> f64 {
    if form > 5.0 {
        1.2
    } else if form > 3.0 {
        1.1
    } else {
        1.0
    }
}

fn fall_form_boost(form: f64) -> f64 {
    if form < 2.0 {
        1.3
    } else if form < 3.0 {
        1.15
    } else {
        1.0
    }
}

/// Every applicable check contributes, in a fixed order.
fn price_reasoning(player: &PlayerTransferStats, net: i64, threshold: f64, gameweek: u32) -> Vec<String> {
    let mut reasoning = Vec::new();

    if net == 0 {
        reasoning.push("Transfers in and out are balanced".to_string());
    }
    if net.unsigned_abs() as f64 > threshold * 0.8 {
        reasoning.push(format!(
            "Net transfers ({net:+}) close to or past the change threshold ({threshold:.0})"
        ));
    }
    if player.form > 6.0 {
        reasoning.push(format!("Excellent form ({:.1}) attracting managers", player.form));
    }
    if player.form < 2.0 {
        reasoning.push(format!("Poor form ({:.1}) driving sales", player.form));
    }
    if player.ownership > 30.0 {
        reasoning.push(format!(
            "High ownership ({:.1}%) slows price movement",
            player.ownership
        ));
    }
    if player.ownership < 5.0 {
        reasoning.push(format!(
            "Low ownership ({:.1}%) makes the price sensitive to transfers",
            player.ownership
        ));
    }
    if gameweek < EARLY_SEASON_GAMEWEEK {
        reasoning.push("Early season: prices move on fewer transfers".to_string());
    }

    reasoning
}

/// Bucket probability into days until the change, or `UNLIKELY_CHANGE`.
pub fn expected_change_date(probability: f64, today: NaiveDate) -> String {
    let days = if probability > 80.0 {
        1
    } else if probability > 60.0 {
        2
    } else if probability > 40.0 {
        3
    } else {
        return UNLIKELY_CHANGE.to_string();
    };

    today
        .checked_add_days(Days::new(days))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNLIKELY_CHANGE.to_string())
}

pub fn probability_confidence(probability: f64) -> ConfidenceLevel {
    if probability > 70.0 {
        ConfidenceLevel::High
    } else if probability > 50.0 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
