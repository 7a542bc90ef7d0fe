//! Move ordering for alpha-beta.
//!
//! Candidates are tried in descending order of a composite key:
//! killer slot 1, killer slot 2, capture bonus, then local hints (material a
//! capture wins and rows gained toward the enemy). Good moves first means more
//! cutoffs; ordering never changes the searched score.

use serde::{Deserialize, Serialize};

use crate::board::{GameState, Occupancy, Team, Tile};
use crate::movegen::Move;

/// Coefficients of the ordering key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingWeights {
    pub killer_primary: f32,
    pub killer_secondary: f32,
    pub capture: f32,
    pub heuristic_multiplier: f32,
    pub forward_multiplier: f32,
}

impl Default for OrderingWeights {
    fn default() -> Self {
        OrderingWeights {
            killer_primary: 10_000.0,
            killer_secondary: 9_000.0,
            capture: 5_000.0,
            heuristic_multiplier: 10.0,
            forward_multiplier: 1.0,
        }
    }
}

/// The identity of a move as far as the killer table cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KillerMove {
    pub from: Tile,
    pub to: Tile,
}

impl From<&Move> for KillerMove {
    fn from(mv: &Move) -> Self {
        KillerMove {
            from: mv.from,
            to: mv.to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct KillerEntry {
    mv: KillerMove,
    /// Score from the perspective of the side that played the move.
    score: f32,
}

/// Two killer slots per remaining depth.
#[derive(Debug, Clone, Default)]
pub struct KillerTable {
    slots: Vec<[Option<KillerEntry>; 2]>,
}

impl KillerTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every recorded killer.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Records a move that caused a cutoff at `depth`.
    ///
    /// The move takes slot 1 when it beats the current slot-1 score (slot 1
    /// shifts down), otherwise it takes slot 2.
    pub fn record(&mut self, depth: usize, mv: KillerMove, score: f32) {
        if self.slots.len() <= depth {
            self.slots.resize(depth + 1, [None, None]);
        }
        let [first, second] = &mut self.slots[depth];

        if let Some(entry) = first.as_mut().filter(|e| e.mv == mv) {
            entry.score = entry.score.max(score);
            return;
        }

        let entry = KillerEntry { mv, score };
        match first {
            Some(current) if score <= current.score => {
                *second = Some(entry);
            }
            _ => {
                *second = first.take();
                *first = Some(entry);
            }
        }
    }

    /// Which slot (1 or 2) holds `mv` at `depth`, if any.
    pub fn slot(&self, depth: usize, mv: KillerMove) -> Option<u8> {
        let [first, second] = self.slots.get(depth)?;
        if first.is_some_and(|e| e.mv == mv) {
            Some(1)
        } else if second.is_some_and(|e| e.mv == mv) {
            Some(2)
        } else {
            None
        }
    }
}

/// Material a move wins outright: the victim's worth for a capture, plus the
/// mover's damage when a Boss unit reaches the Player's back row.
fn heuristic_delta(state: &GameState, mv: &Move, side: Team) -> f32 {
    let mut delta = 0.0;
    if mv.capture {
        if let Some(victim) = state.unit_at(mv.to) {
            delta += victim.worth;
        }
    }
    if side == Team::Boss && mv.to.row == Team::Player.home_row(state.rows()) {
        if let Some(mover) = state.unit(mv.unit) {
            delta += mover.effective_damage() as f32;
        }
    }
    delta
}

/// Rows gained toward the opponent.
fn forward_delta(mv: &Move, side: Team) -> f32 {
    (mv.to.row as i16 - mv.from.row as i16) as f32 * side.forward() as f32
}

/// Computes the ordering key of one move.
pub fn ordering_key(
    state: &GameState,
    mv: &Move,
    side: Team,
    depth: usize,
    killers: &KillerTable,
    w: &OrderingWeights,
) -> f32 {
    let mut key = match killers.slot(depth, KillerMove::from(mv)) {
        Some(1) => w.killer_primary,
        Some(_) => w.killer_secondary,
        None => 0.0,
    };
    if mv.capture {
        key += w.capture;
    }
    key + heuristic_delta(state, mv, side) * w.heuristic_multiplier
        + forward_delta(mv, side) * w.forward_multiplier
}

/// Sorts `moves` best-first. Ties keep generation order.
pub fn order_moves(
    state: &GameState,
    moves: &mut Vec<Move>,
    side: Team,
    depth: usize,
    killers: &KillerTable,
    w: &OrderingWeights,
) {
    let mut keyed: Vec<(f32, Move)> = moves
        .iter()
        .map(|mv| (ordering_key(state, mv, side, depth, killers, w), *mv))
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    moves.clear();
    moves.extend(keyed.into_iter().map(|(_, mv)| mv));
}
