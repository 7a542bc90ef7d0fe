//! Buff target selection.

use rand::rngs::SmallRng;

use crate::board::{DurationKind, EffectId, GameState, Team, UnitEffectSnapshot, UnitId};
use crate::builder::{LiveUnit, Roster};
use crate::search::SearchEngine;

use super::{resolve_unit, select, Decision, SelectError};

/// Boss units on the board that can still take `effect`.
pub fn buff_candidates(state: &GameState, effect: EffectId, cap: usize) -> Vec<UnitId> {
    state
        .units_of(Team::Boss)
        .filter(|u| u.position.is_some() && !u.has_effect(effect) && u.effects.len() < cap)
        .map(|u| u.id)
        .collect()
}

/// Same as `buff_candidates`, read straight from live units. Units whose
/// effects cannot be read are skipped.
pub fn live_buff_candidates<U: LiveUnit>(roster: &Roster<'_, U>, effect: EffectId, cap: usize) -> Vec<UnitId> {
    roster
        .iter()
        .filter(|(_, u)| u.team() == Team::Boss && u.position().is_some())
        .filter(|(_, u)| {
            u.effects()
                .is_some_and(|fx| fx.len() < cap && fx.iter().all(|e| e.effect != effect))
        })
        .map(|(id, _)| id)
        .collect()
}

/// Chooses which Boss unit receives `effect`.
///
/// `root` is the built snapshot, or `None` when building failed.
pub fn select_buff<'a, U: LiveUnit>(
    search: &mut SearchEngine,
    rng: &mut SmallRng,
    roster: &Roster<'a, U>,
    root: Option<&GameState>,
    effect: &UnitEffectSnapshot,
    cap: usize,
    depth: i32,
) -> Result<Decision<&'a U>, SelectError> {
    if effect.duration == DurationKind::Temporary && effect.remaining <= 0 {
        return Err(SelectError::InvalidInput(format!(
            "effect {} lasts {} turns",
            effect.effect.0, effect.remaining
        )));
    }
    if cap == 0 {
        return Err(SelectError::InvalidInput("effect cap is zero".into()));
    }

    let candidates = match root {
        Some(state) => buff_candidates(state, effect.effect, cap),
        None => live_buff_candidates(roster, effect.effect, cap),
    };
    let decision = select(search, rng, root, candidates, depth, |state, id| match state.unit(*id) {
        Some(unit) => state.with_unit_replaced(unit.with_effect(*effect)),
        None => state.clone(),
    })?;
    decision.try_map(|id| resolve_unit(roster, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{StatLayer, Tile, UnitKind};
    use crate::builder::StateBuilder;
    use crate::table::{Table, TableUnit};
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(5)
    }

    fn shield(id: u16) -> UnitEffectSnapshot {
        UnitEffectSnapshot::invulnerable(EffectId(id), DurationKind::Temporary, 2)
    }

    fn table() -> Table {
        let mut t = Table::new(6, 6, 10);
        t.add(TableUnit::new("rook", Team::Boss, UnitKind::Rook, Some(Tile::new(5, 0))));
        t.add(TableUnit::new("pawn", Team::Boss, UnitKind::Pawn, Some(Tile::new(3, 3))));
        t.add(TableUnit::new("hero", Team::Player, UnitKind::Queen, Some(Tile::new(1, 3))));
        t.add(TableUnit::new("bench", Team::Boss, UnitKind::Knight, None));
        t
    }

    #[test]
    fn candidates_exclude_capped_and_duplicate_effects() {
        let mut t = table();
        t.units_mut()[0].effects.push(shield(9));
        let snap = StateBuilder::build(&t, t.units()).unwrap();
        assert_eq!(buff_candidates(&snap.state, EffectId(9), 3), vec![UnitId(1)]);
        assert_eq!(buff_candidates(&snap.state, EffectId(4), 1), vec![UnitId(1)]);
        assert_eq!(buff_candidates(&snap.state, EffectId(4), 3), vec![UnitId(0), UnitId(1)]);
        assert_eq!(live_buff_candidates(&snap.roster, EffectId(9), 3), vec![UnitId(1)]);
    }

    #[test]
    fn single_candidate_maps_to_live_unit() {
        let mut t = table();
        t.units_mut()[0].effects.push(shield(9));
        let snap = StateBuilder::build(&t, t.units()).unwrap();
        let mut search = SearchEngine::default();
        let d = select_buff(&mut search, &mut rng(), &snap.roster, Some(&snap.state), &shield(9), 3, 2).unwrap();
        assert_eq!(d.target().unwrap().name, "pawn");
        assert_eq!(search.stats().nodes, 0);
    }

    #[test]
    fn shields_the_threatened_unit() {
        // The player queen attacks the pawn on column 3; the rook is safe.
        let t = table();
        let snap = StateBuilder::build(&t, t.units()).unwrap();
        let mut search = SearchEngine::default();
        let d = select_buff(&mut search, &mut rng(), &snap.roster, Some(&snap.state), &shield(1), 3, 1).unwrap();
        assert_eq!(d.target().unwrap().name, "pawn");
    }

    #[test]
    fn builder_failure_picks_randomly_from_live_units() {
        let mut t = table();
        t.units_mut()[2].corrupt = true;
        assert!(StateBuilder::build(&t, t.units()).is_none());
        let roster = Roster::of(t.units());
        let mut search = SearchEngine::default();
        let buff = UnitEffectSnapshot::new(EffectId(3), DurationKind::Permanent, 0)
            .with_stats(StatLayer { health: 2, damage: 0 });
        let d = select_buff(&mut search, &mut rng(), &roster, None, &buff, 3, 2).unwrap();
        assert!(matches!(d, Decision::Random(u) if u.team == Team::Boss && u.position.is_some()));
    }

    #[test]
    fn no_boss_units_is_no_valid_target() {
        let mut t = Table::new(4, 4, 10);
        t.add(TableUnit::new("hero", Team::Player, UnitKind::Pawn, Some(Tile::new(0, 0))));
        let snap = StateBuilder::build(&t, t.units()).unwrap();
        let mut search = SearchEngine::default();
        let r = select_buff(&mut search, &mut rng(), &snap.roster, Some(&snap.state), &shield(1), 3, 2);
        assert_eq!(r.unwrap_err(), SelectError::NoValidTarget);
    }

    #[test]
    fn expired_effect_is_invalid() {
        let t = table();
        let roster = Roster::of(t.units());
        let mut search = SearchEngine::default();
        let dead = UnitEffectSnapshot::new(EffectId(1), DurationKind::Temporary, 0);
        let r = select_buff(&mut search, &mut rng(), &roster, None, &dead, 3, 2);
        assert!(matches!(r, Err(SelectError::InvalidInput(_))));
    }
}
