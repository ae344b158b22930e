//! WASM bindings for frontend match replay

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;
use crate::{Match, MatchConfig, StrategyKind};

fn parse_kind(json: &str) -> Result<StrategyKind, String> {
    serde_json::from_str::<StrategyKind>(json).map_err(|e| format!("Invalid strategy: {}", e))
}

/// Replay a match between two built-in strategies
///
/// # Arguments
/// * `strategy_a_json` - JSON serialized StrategyKind for player 1 (e.g. `"TitForTat"`)
/// * `strategy_b_json` - JSON serialized StrategyKind for player 2
/// * `turns` - Number of turns
/// * `noise` - Probability in [0, 1] that an action is flipped
/// * `seed` - 32-byte randomness seed
/// * `match_index` - Index mixed into the seed
///
/// # Returns
/// JSON serialized MatchSummary
#[wasm_bindgen]
pub fn replay_match(
    strategy_a_json: &str,
    strategy_b_json: &str,
    turns: u32,
    noise: f64,
    seed: &[u8],
    match_index: u32,
) -> Result<JsValue, JsError> {
    let kind_a = parse_kind(strategy_a_json)
        .map_err(|e| JsError::new(&format!("Invalid strategy A: {}", e)))?;
    let kind_b = parse_kind(strategy_b_json)
        .map_err(|e| JsError::new(&format!("Invalid strategy B: {}", e)))?;

    let seed_arr: [u8; 32] = seed.try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))?;

    let config = MatchConfig::new(turns as usize)
        .with_noise(noise)
        .with_seed(seed_arr, match_index);

    let mut player_a = kind_a.build();
    let mut player_b = kind_b.build();
    let mut m = Match::new(player_a.as_mut(), player_b.as_mut(), config)
        .map_err(|e| JsError::new(&e.to_string()))?;
    m.play();

    serde_wasm_bindgen::to_value(&m.summary())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Render a replayed match as two sparkline rows
#[wasm_bindgen]
pub fn replay_sparklines(
    strategy_a_json: &str,
    strategy_b_json: &str,
    turns: u32,
    c_symbol: char,
    d_symbol: char,
) -> Result<String, JsError> {
    let kind_a = parse_kind(strategy_a_json).map_err(|e| JsError::new(&e))?;
    let kind_b = parse_kind(strategy_b_json).map_err(|e| JsError::new(&e))?;

    let mut player_a = kind_a.build();
    let mut player_b = kind_b.build();
    let mut m = Match::new(player_a.as_mut(), player_b.as_mut(), MatchConfig::new(turns as usize))
        .map_err(|e| JsError::new(&e.to_string()))?;
    m.play();

    Ok(m.sparklines(c_symbol, d_symbol))
}

#[derive(serde::Serialize)]
struct StrategyInfo {
    id: StrategyKind,
    name: String,
    stochastic: bool,
    description: String,
}

/// Get all available strategy kinds
#[wasm_bindgen]
pub fn get_strategy_types() -> Result<JsValue, JsError> {
    let types: Vec<StrategyInfo> = StrategyKind::ALL
        .iter()
        .map(|kind| {
            let player = kind.build();
            StrategyInfo {
                id: *kind,
                name: player.name().to_string(),
                stochastic: player.classifier().stochastic,
                description: kind.description().to_string(),
            }
        })
        .collect();

    serde_wasm_bindgen::to_value(&types)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
