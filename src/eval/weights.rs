//! Evaluation weight table.
//!
//! Designer-tunable coefficients for every evaluation component. Plain data:
//! deserializable from JSON, every field optional.

use serde::{Deserialize, Serialize};

/// Coefficients for the static evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    pub player_hp: f32,

    pub unit_damage: f32,
    pub unit_health: f32,
    pub unit_worth: f32,
    pub unit_moves: f32,
    pub unattackable_bonus: f32,

    pub infinite_lifetime_bonus: f32,
    /// Applied to units with exactly one turn left.
    pub last_turn_penalty: f32,
    /// Applied per turn below `low_lifetime_turns`.
    pub low_lifetime_penalty: f32,
    pub low_lifetime_turns: i32,

    pub forward_progress: f32,
    /// Scales `forward_progress` for Player units advancing on the Boss.
    pub player_advance_multiplier: f32,
    pub center_bias: f32,
    pub back_row_threat: f32,

    pub spawn_threat: f32,
    pub spawn_unattackable_multiplier: f32,
    pub spawn_invulnerable_per_turn: f32,
    pub spawn_min_multiplier: f32,

    pub danger: f32,
    pub undefended_multiplier: f32,

    pub boss_mobility: f32,
    pub player_mobility: f32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            player_hp: 1.0,
            unit_damage: 1.5,
            unit_health: 1.0,
            unit_worth: 2.0,
            unit_moves: 0.5,
            unattackable_bonus: 2.0,
            infinite_lifetime_bonus: 1.0,
            last_turn_penalty: 4.0,
            low_lifetime_penalty: 0.5,
            low_lifetime_turns: 3,
            forward_progress: 0.5,
            player_advance_multiplier: 1.5,
            center_bias: 0.25,
            back_row_threat: 2.0,
            spawn_threat: 1.0,
            spawn_unattackable_multiplier: 0.25,
            spawn_invulnerable_per_turn: 0.15,
            spawn_min_multiplier: 0.1,
            danger: 0.75,
            undefended_multiplier: 1.5,
            boss_mobility: 0.05,
            player_mobility: 0.08,
        }
    }
}
