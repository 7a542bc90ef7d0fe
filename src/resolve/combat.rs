//! Move resolution.
//!
//! Applies a single move to a state and returns the successor. Moving onto an
//! empty tile relocates the unit; moving onto an enemy is an attack:
//!
//! - the defender takes the attacker's effective damage and dies at zero
//!   effective health, in which case the attacker takes its tile;
//! - a surviving defender keeps its tile and the attacker stays put;
//! - thorns on the defender reflect part of the damage to the attacker.
//!
//! A Boss unit that ends its move on the Player's back row strikes the player
//! for its damage and leaves the board.

use crate::board::{GameState, Occupancy, Team, UnitSnapshot};
use crate::movegen::Move;

/// Applies `mv` and returns the successor state. `state` is left untouched.
///
/// Moves naming an unknown unit, or landing on a friendly unit, return an
/// unchanged copy.
pub fn apply_move(state: &GameState, mv: &Move) -> GameState {
    let Some(attacker) = state.unit(mv.unit) else {
        return state.clone();
    };

    let mut next = state.clone();
    let mut mover: Option<UnitSnapshot> = Some(attacker.clone());

    match state.unit_at(mv.to) {
        None => {
            if let Some(m) = mover.as_mut() {
                m.position = Some(mv.to);
            }
        }
        Some(defender) if defender.team == attacker.team => return state.clone(),
        Some(defender) => {
            let damage = attacker.effective_damage();
            let reflected = reflected_damage(damage, defender.thorns());

            let defender_dies = defender.effective_health().saturating_sub(damage) <= 0;
            if defender_dies {
                next.units_mut().retain(|u| u.id != defender.id);
                if let Some(m) = mover.as_mut() {
                    m.position = Some(mv.to);
                }
            } else {
                let hurt = UnitSnapshot {
                    health: defender.health.saturating_sub(damage),
                    ..defender.clone()
                };
                next = next.with_unit_replaced(hurt);
            }

            if reflected > 0 {
                if let Some(m) = mover.as_mut() {
                    m.health = m.health.saturating_sub(reflected);
                }
                if mover.as_ref().is_some_and(|m| m.effective_health() <= 0) {
                    mover = None;
                }
            }
        }
    }

    let Some(mover) = mover else {
        return next.without_unit(attacker.id);
    };

    let player_home = Team::Player.home_row(state.rows());
    if mover.team == Team::Boss && mover.position.is_some_and(|t| t.row == player_home) {
        let hp = next.player_hp().saturating_sub(mover.effective_damage());
        next.set_player_hp(hp);
        return next.without_unit(mover.id);
    }

    next.with_unit_replaced(mover)
}

/// Thorns share of `damage`, rounded down.
fn reflected_damage(damage: i32, thorns_pct: u32) -> i32 {
    let reflected = i64::from(damage.max(0)) * i64::from(thorns_pct) / 100;
    i32::try_from(reflected).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{DurationKind, EffectId, Tile, UnitEffectSnapshot, UnitId, UnitKind};
    use crate::protocol::parse_position;

    fn mv(state: &GameState, id: u16, to: Tile) -> Move {
        let unit = state.unit(UnitId(id)).unwrap();
        Move {
            unit: unit.id,
            from: unit.position.unwrap(),
            to,
            capture: state.unit_at(to).is_some(),
        }
    }

    fn duel(defender_health: i32) -> GameState {
        let mut defender = UnitSnapshot::new(UnitId(1), Team::Player, UnitKind::Pawn, Tile::new(4, 4));
        defender.health = defender_health;
        GameState::new(8, 8, 20)
            .with_unit(UnitSnapshot::new(UnitId(0), Team::Boss, UnitKind::Rook, Tile::new(6, 4)))
            .with_unit(defender)
    }

    #[test]
    fn quiet_move_relocates() {
        let state = duel(2);
        let next = apply_move(&state, &mv(&state, 0, Tile::new(5, 4)));
        assert_eq!(next.unit(UnitId(0)).unwrap().position, Some(Tile::new(5, 4)));
        assert_eq!(state.unit(UnitId(0)).unwrap().position, Some(Tile::new(6, 4)));
    }

    #[test]
    fn lethal_attack_takes_the_tile() {
        let state = duel(3);
        let next = apply_move(&state, &mv(&state, 0, Tile::new(4, 4)));
        assert!(next.unit(UnitId(1)).is_none());
        assert_eq!(next.unit(UnitId(0)).unwrap().position, Some(Tile::new(4, 4)));
    }

    #[test]
    fn surviving_defender_keeps_tile() {
        let state = duel(5);
        let next = apply_move(&state, &mv(&state, 0, Tile::new(4, 4)));
        let defender = next.unit(UnitId(1)).unwrap();
        assert_eq!(defender.health, 2);
        assert_eq!(defender.position, Some(Tile::new(4, 4)));
        assert_eq!(next.unit(UnitId(0)).unwrap().position, Some(Tile::new(6, 4)));
    }

    #[test]
    fn thorns_can_kill_the_attacker() {
        let mut attacker = UnitSnapshot::new(UnitId(0), Team::Boss, UnitKind::Rook, Tile::new(6, 4));
        attacker.health = 1;
        let defender = UnitSnapshot::new(UnitId(1), Team::Player, UnitKind::Knight, Tile::new(4, 4))
            .with_effect(UnitEffectSnapshot::new(EffectId(2), DurationKind::Permanent, 0).with_thorns(50));
        let state = GameState::new(8, 8, 20).with_unit(attacker).with_unit(defender);
        let next = apply_move(&state, &mv(&state, 0, Tile::new(4, 4)));
        // Rook deals 3 to a 3-health knight and takes 1 back.
        assert!(next.unit(UnitId(0)).is_none());
        assert!(next.unit(UnitId(1)).is_none());
    }

    #[test]
    fn boss_reaching_player_row_strikes_player() {
        let state = GameState::new(8, 8, 20).with_unit(UnitSnapshot::new(
            UnitId(0),
            Team::Boss,
            UnitKind::Rook,
            Tile::new(3, 0),
        ));
        let next = apply_move(&state, &mv(&state, 0, Tile::new(0, 0)));
        assert_eq!(next.player_hp(), 17);
        assert!(next.units().is_empty());
    }

    #[test]
    fn huge_damage_against_full_thorns_saturates() {
        let state = parse_position("4x4/10/bRa4:d2000000000,pPa2:t100/-").unwrap();
        let next = apply_move(&state, &mv(&state, 0, Tile::new(1, 0)));
        // The pawn dies and reflects the full hit, killing the rook too.
        assert!(next.units().is_empty());
        assert_eq!(reflected_damage(i32::MAX, 100), i32::MAX);
        assert_eq!(reflected_damage(-5, 50), 0);
    }

    #[test]
    fn huge_damage_on_back_row_floors_player_hp() {
        let state = parse_position("4x4/-2147483000/bRa2:d2000000000/-").unwrap();
        let next = apply_move(&state, &mv(&state, 0, Tile::new(0, 0)));
        assert_eq!(next.player_hp(), i32::MIN);
        assert!(next.units().is_empty());
    }

    #[test]
    fn friendly_destination_is_rejected() {
        let state = duel(2).with_unit(UnitSnapshot::new(
            UnitId(2),
            Team::Boss,
            UnitKind::Pawn,
            Tile::new(5, 4),
        ));
        let bogus = Move {
            unit: UnitId(0),
            from: Tile::new(6, 4),
            to: Tile::new(5, 4),
            capture: false,
        };
        assert_eq!(apply_move(&state, &bogus), state);
    }
}
