//! Heuristic position evaluation.
//!
//! Scores a board from the Boss's point of view as a weighted sum of
//! independent components: player health, unit values on both sides,
//! lifetimes, forward progress, center control, back-row pressure, exposure to
//! freshly spawned pawns, capture danger, and mobility.
//!
//! The total is the plain sum of the components, with no normalization.

use crate::board::{GameState, Occupancy, Team, Tile, UnitId, UnitKind, UnitSnapshot};
use crate::movegen::{legal_moves, mobility, threatens};

use super::weights::EvalWeights;

/// Every evaluation component, already weighted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvalBreakdown {
    pub player_hp: f32,
    pub boss_units: f32,
    pub player_units: f32,
    pub boss_position: f32,
    pub player_position: f32,
    pub center_bias: f32,
    pub lifetime: f32,
    pub player_threats: f32,
    pub spawn_threats: f32,
    pub danger: f32,
    pub mobility: f32,
}

impl EvalBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> f32 {
        self.player_hp
            + self.boss_units
            + self.player_units
            + self.boss_position
            + self.player_position
            + self.center_bias
            + self.lifetime
            + self.player_threats
            + self.spawn_threats
            + self.danger
            + self.mobility
    }

    /// Component names paired with their values, in declaration order.
    pub fn components(&self) -> [(&'static str, f32); 11] {
        [
            ("player_hp", self.player_hp),
            ("boss_units", self.boss_units),
            ("player_units", self.player_units),
            ("boss_position", self.boss_position),
            ("player_position", self.player_position),
            ("center_bias", self.center_bias),
            ("lifetime", self.lifetime),
            ("player_threats", self.player_threats),
            ("spawn_threats", self.spawn_threats),
            ("danger", self.danger),
            ("mobility", self.mobility),
        ]
    }
}

/// Static evaluator parameterized by a weight table.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    weights: EvalWeights,
}

impl Evaluator {
    /// Creates an evaluator with the given weights.
    pub fn new(weights: EvalWeights) -> Self {
        Evaluator { weights }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    /// Boss-perspective score.
    pub fn evaluate(&self, state: &GameState) -> f32 {
        self.breakdown(state).total()
    }

    /// Score from `side`'s perspective: the Boss score, negated for the Player.
    pub fn evaluate_for(&self, state: &GameState, side: Team) -> f32 {
        match side {
            Team::Boss => self.evaluate(state),
            Team::Player => -self.evaluate(state),
        }
    }

    /// Computes every component of the Boss-perspective score.
    pub fn breakdown(&self, state: &GameState) -> EvalBreakdown {
        let w = &self.weights;
        let rows = state.rows();
        let mut b = EvalBreakdown {
            player_hp: -w.player_hp * state.player_hp() as f32,
            ..EvalBreakdown::default()
        };

        for unit in state.units() {
            let value = unit_value(unit, w);
            let life = lifetime_score(unit.lifetime, w);
            match unit.team {
                Team::Boss => {
                    b.boss_units += value;
                    b.lifetime += life;
                }
                Team::Player => {
                    b.player_units -= value;
                    b.lifetime -= life;
                }
            }

            let Some(tile) = unit.position else {
                continue;
            };
            let progress = unit.team.progress(tile.row, rows) as f32;
            match unit.team {
                Team::Boss => {
                    b.boss_position += w.forward_progress * progress;
                    b.center_bias += w.center_bias * center_score(tile.row, rows);
                }
                Team::Player => {
                    b.player_position -= w.forward_progress * w.player_advance_multiplier * progress;
                    b.player_threats -= w.back_row_threat * closeness(progress, rows);
                }
            }
        }

        b.spawn_threats = -w.spawn_threat * spawn_exposure(state, w);
        b.danger = -w.danger * capture_danger(state, w);
        b.mobility = w.boss_mobility * mobility(state, Team::Boss) as f32
            - w.player_mobility * mobility(state, Team::Player) as f32;

        b
    }
}

/// Intrinsic value of a unit from its effective stats.
pub fn unit_value(unit: &UnitSnapshot, w: &EvalWeights) -> f32 {
    let mut value = w.unit_damage * unit.effective_damage() as f32
        + w.unit_health * unit.effective_health() as f32
        + w.unit_worth * unit.worth
        + w.unit_moves * unit.moves_per_turn as f32;
    if !unit.can_be_attacked() {
        value += w.unattackable_bonus;
    }
    value
}

/// Bonus for permanent units, penalties for units about to expire.
fn lifetime_score(lifetime: i32, w: &EvalWeights) -> f32 {
    if lifetime < 0 {
        w.infinite_lifetime_bonus
    } else if lifetime == 1 {
        -w.last_turn_penalty
    } else if lifetime <= w.low_lifetime_turns {
        -w.low_lifetime_penalty * (w.low_lifetime_turns - lifetime + 1) as f32
    } else {
        0.0
    }
}

/// 1 on the middle row(s), falling to 0 at either back row.
fn center_score(row: u8, rows: u8) -> f32 {
    let centre = (rows.saturating_sub(1)) as f32 / 2.0;
    if centre <= 0.0 {
        return 0.0;
    }
    (1.0 - (row as f32 - centre).abs() / centre).max(0.0)
}

/// How far along the board `progress` rows are, in 0..=1.
fn closeness(progress: f32, rows: u8) -> f32 {
    let span = rows.saturating_sub(1);
    if span == 0 {
        return 1.0;
    }
    progress / span as f32
}

/// Summed worth of Boss units a pawn spawned on a free Player back-row tile
/// could capture, each scaled by how protected the unit currently is.
fn spawn_exposure(state: &GameState, w: &EvalWeights) -> f32 {
    let home = Team::Player.home_row(state.rows());
    let spawn_tiles: Vec<Tile> = (0..state.cols())
        .map(|c| Tile::new(home, c))
        .filter(|t| state.is_free(*t))
        .collect();
    if spawn_tiles.is_empty() {
        return 0.0;
    }

    let pawn_rules = UnitKind::Pawn.movement();
    let mut exposure = 0.0;
    for unit in state.units_of(Team::Boss) {
        let Some(tile) = unit.position else {
            continue;
        };
        let exposed = spawn_tiles.iter().any(|&spawn| {
            let pawn = UnitSnapshot::new(UnitId(u16::MAX), Team::Player, UnitKind::Pawn, spawn);
            threatens(state, &pawn, pawn_rules, tile)
        });
        if !exposed {
            continue;
        }

        let mut multiplier = 1.0;
        if !unit.can_be_attacked() {
            multiplier *= w.spawn_unattackable_multiplier;
            multiplier -= w.spawn_invulnerable_per_turn * unit.invulnerable_turns() as f32;
        }
        exposure += multiplier.max(w.spawn_min_multiplier) * unit.worth;
    }
    exposure
}

/// Summed worth of Boss units the Player can capture next turn, scaled by the
/// number of attackers and by whether any other Boss unit guards the tile.
fn capture_danger(state: &GameState, w: &EvalWeights) -> f32 {
    let attackers: Vec<(&UnitSnapshot, Vec<Tile>)> = state
        .units_of(Team::Player)
        .filter(|u| u.position.is_some())
        .map(|u| (u, legal_moves(state, u, u.kind.movement())))
        .collect();

    let mut danger = 0.0;
    for unit in state.units_of(Team::Boss) {
        let Some(tile) = unit.position else {
            continue;
        };
        let count = attackers.iter().filter(|(_, moves)| moves.contains(&tile)).count();
        if count == 0 {
            continue;
        }
        let defended = state
            .units_of(Team::Boss)
            .any(|d| d.id != unit.id && threatens(state, d, d.kind.movement(), tile));
        let mut penalty = count as f32 * unit.worth;
        if !defended {
            penalty *= w.undefended_multiplier;
        }
        danger += penalty;
    }
    danger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{DurationKind, EffectId, UnitEffectSnapshot};

    fn boss(id: u16, kind: UnitKind, row: u8, col: u8) -> UnitSnapshot {
        UnitSnapshot::new(UnitId(id), Team::Boss, kind, Tile::new(row, col))
    }

    fn player(id: u16, kind: UnitKind, row: u8, col: u8) -> UnitSnapshot {
        UnitSnapshot::new(UnitId(id), Team::Player, kind, Tile::new(row, col))
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn total_is_sum_of_components() {
        let b = EvalBreakdown {
            player_hp: 5.0,
            boss_units: 3.0,
            player_units: -2.0,
            boss_position: 1.0,
            player_position: -1.0,
            center_bias: 0.5,
            lifetime: -0.3,
            player_threats: -1.0,
            spawn_threats: -0.2,
            danger: -0.4,
            mobility: 0.1,
        };
        assert!(close(b.total(), 4.7));
        let summed: f32 = b.components().iter().map(|(_, v)| v).sum();
        assert!(close(summed, b.total()));
    }

    #[test]
    fn lower_player_hp_is_better_for_boss() {
        let e = Evaluator::default();
        let healthy = GameState::new(8, 8, 20);
        let hurt = GameState::new(8, 8, 5);
        assert!(e.evaluate(&hurt) > e.evaluate(&healthy));
        assert!(close(e.breakdown(&hurt).player_hp, -5.0));
    }

    #[test]
    fn more_worth_means_more_boss_unit_value() {
        let e = Evaluator::default();
        let base = GameState::new(8, 8, 10).with_unit(boss(0, UnitKind::Rook, 7, 0));
        let mut richer = boss(0, UnitKind::Rook, 7, 0);
        richer.worth += 1.0;
        let better = GameState::new(8, 8, 10).with_unit(richer);
        let before = e.breakdown(&base);
        let after = e.breakdown(&better);
        assert!(after.boss_units > before.boss_units);
        assert_eq!(after.player_units, before.player_units);
        assert_eq!(after.mobility, before.mobility);
    }

    #[test]
    fn evaluate_for_player_is_negated() {
        let e = Evaluator::default();
        let state = GameState::new(8, 8, 10)
            .with_unit(boss(0, UnitKind::Queen, 5, 3))
            .with_unit(player(1, UnitKind::Knight, 2, 2));
        assert_eq!(e.evaluate_for(&state, Team::Player), -e.evaluate_for(&state, Team::Boss));
    }

    #[test]
    fn lifetime_scores() {
        let w = EvalWeights::default();
        assert_eq!(lifetime_score(-1, &w), w.infinite_lifetime_bonus);
        assert_eq!(lifetime_score(1, &w), -w.last_turn_penalty);
        assert!(close(lifetime_score(2, &w), -w.low_lifetime_penalty * 2.0));
        assert!(close(lifetime_score(3, &w), -w.low_lifetime_penalty));
        assert_eq!(lifetime_score(10, &w), 0.0);
    }

    #[test]
    fn center_rows_score_highest() {
        assert!(close(center_score(0, 9), 0.0));
        assert!(close(center_score(8, 9), 0.0));
        assert!(close(center_score(4, 9), 1.0));
        assert!(center_score(3, 8) > center_score(1, 8));
        assert_eq!(center_score(0, 1), 0.0);
    }

    #[test]
    fn advancing_player_units_hurt_the_boss() {
        let e = Evaluator::default();
        let far = GameState::new(8, 8, 10).with_unit(player(0, UnitKind::Rook, 1, 0));
        let near = GameState::new(8, 8, 10).with_unit(player(0, UnitKind::Rook, 6, 0));
        let (bf, bn) = (e.breakdown(&far), e.breakdown(&near));
        assert!(bn.player_threats < bf.player_threats);
        assert!(bn.player_position < bf.player_position);
    }

    #[test]
    fn spawn_exposure_respects_protection_floor() {
        let w = EvalWeights::default();
        let exposed = GameState::new(8, 8, 10).with_unit(boss(0, UnitKind::Rook, 1, 3));
        assert!(close(spawn_exposure(&exposed, &w), 5.0));

        let shielded = boss(0, UnitKind::Rook, 1, 3).with_effect(UnitEffectSnapshot::invulnerable(
            EffectId(1),
            DurationKind::Permanent,
            0,
        ));
        let state = GameState::new(8, 8, 10).with_unit(shielded);
        assert!(close(spawn_exposure(&state, &w), w.spawn_min_multiplier * 5.0));

        let brief = boss(0, UnitKind::Rook, 1, 3).with_effect(UnitEffectSnapshot::invulnerable(
            EffectId(1),
            DurationKind::Temporary,
            1,
        ));
        let state = GameState::new(8, 8, 10).with_unit(brief);
        let expected = (w.spawn_unattackable_multiplier - w.spawn_invulnerable_per_turn)
            .max(w.spawn_min_multiplier)
            * 5.0;
        assert!(close(spawn_exposure(&state, &w), expected));
    }

    #[test]
    fn spawn_exposure_needs_free_back_row_tiles() {
        let w = EvalWeights::default();
        let state = GameState::new(8, 8, 10)
            .with_unit(boss(0, UnitKind::Rook, 1, 3))
            .with_unit(player(1, UnitKind::Pawn, 0, 2))
            .with_unit(player(2, UnitKind::Pawn, 0, 4));
        assert_eq!(spawn_exposure(&state, &w), 0.0);
        let deep = GameState::new(8, 8, 10).with_unit(boss(0, UnitKind::Rook, 4, 3));
        assert_eq!(spawn_exposure(&deep, &w), 0.0);
    }

    #[test]
    fn undefended_units_are_in_more_danger() {
        let w = EvalWeights::default();
        let lone = GameState::new(8, 8, 10)
            .with_unit(boss(0, UnitKind::Knight, 4, 4))
            .with_unit(player(1, UnitKind::Rook, 4, 0));
        let guarded = lone.with_unit(boss(2, UnitKind::Rook, 7, 4));
        let lone_danger = capture_danger(&lone, &w);
        let guarded_danger = capture_danger(&guarded, &w);
        assert!(close(lone_danger, 3.0 * w.undefended_multiplier));
        assert!(close(guarded_danger, 3.0));
    }

    #[test]
    fn danger_counts_every_attacker() {
        let w = EvalWeights::default();
        let state = GameState::new(8, 8, 10)
            .with_unit(boss(0, UnitKind::Knight, 4, 4))
            .with_unit(boss(2, UnitKind::Rook, 7, 4))
            .with_unit(player(1, UnitKind::Rook, 4, 0))
            .with_unit(player(3, UnitKind::Bishop, 2, 2));
        assert!(close(capture_danger(&state, &w), 6.0));
    }

    #[test]
    fn unattackable_units_are_not_in_danger() {
        let w = EvalWeights::default();
        let shielded = boss(0, UnitKind::Knight, 4, 4).with_effect(UnitEffectSnapshot::invulnerable(
            EffectId(1),
            DurationKind::Temporary,
            2,
        ));
        let state = GameState::new(8, 8, 10)
            .with_unit(shielded)
            .with_unit(player(1, UnitKind::Rook, 4, 0));
        assert_eq!(capture_danger(&state, &w), 0.0);
    }

    #[test]
    fn mobility_penalizes_opponent_more() {
        let e = Evaluator::default();
        // Mirror-image rooks have equal move counts.
        let state = GameState::new(8, 8, 10)
            .with_unit(boss(0, UnitKind::Rook, 7, 0))
            .with_unit(player(1, UnitKind::Rook, 0, 7));
        assert!(e.breakdown(&state).mobility < 0.0);
    }
}
