//! Unit archetypes and unit snapshots.
//!
//! A `UnitSnapshot` is an immutable copy of one unit on the board. Modified
//! units are always new snapshots; nothing here mutates in place.

use std::sync::Arc;

use super::effect::{DurationKind, EffectId, UnitEffectSnapshot};
use super::tile::{Team, Tile};

/// Stable identifier of a unit within one simulation root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u16);

impl UnitId {
    #[inline]
    /// Position in a dense per-unit array.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The archetype of a unit. Determines its movement rules and default stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Base stats an archetype spawns with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    pub health: i32,
    pub damage: i32,
    pub worth: f32,
    pub moves_per_turn: u8,
}

pub const ALL_KINDS: [UnitKind; 6] = [
    UnitKind::Pawn,
    UnitKind::Knight,
    UnitKind::Bishop,
    UnitKind::Rook,
    UnitKind::Queen,
    UnitKind::King,
];

impl UnitKind {
    /// Returns the uppercase notation abbreviation.
    pub const fn notation_char(self) -> char {
        match self {
            UnitKind::Pawn => 'P',
            UnitKind::Knight => 'N',
            UnitKind::Bishop => 'B',
            UnitKind::Rook => 'R',
            UnitKind::Queen => 'Q',
            UnitKind::King => 'K',
        }
    }

    /// Parses a kind from its notation abbreviation.
    pub fn from_notation_char(c: char) -> Option<UnitKind> {
        ALL_KINDS.into_iter().find(|k| k.notation_char() == c)
    }

    /// Default stats for a freshly spawned unit of this archetype.
    pub const fn base_stats(self) -> BaseStats {
        let (health, damage, worth) = match self {
            UnitKind::Pawn => (2, 1, 1.0),
            UnitKind::Knight => (3, 2, 3.0),
            UnitKind::Bishop => (3, 2, 3.0),
            UnitKind::Rook => (5, 3, 5.0),
            UnitKind::Queen => (6, 4, 9.0),
            UnitKind::King => (8, 3, 4.0),
        };
        BaseStats {
            health,
            damage,
            worth,
            moves_per_turn: 1,
        }
    }
}

/// Immutable copy of one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub team: Team,
    pub kind: UnitKind,
    /// None for units that exist but are not on the board.
    pub position: Option<Tile>,
    pub health: i32,
    pub damage: i32,
    /// Remaining turns; -1 means infinite.
    pub lifetime: i32,
    pub worth: f32,
    pub moves_per_turn: u8,
    pub effects: Arc<[UnitEffectSnapshot]>,
}

impl UnitSnapshot {
    /// Creates a unit with the archetype's default stats and no effects.
    pub fn new(id: UnitId, team: Team, kind: UnitKind, position: Tile) -> Self {
        let stats = kind.base_stats();
        UnitSnapshot {
            id,
            team,
            kind,
            position: Some(position),
            health: stats.health,
            damage: stats.damage,
            lifetime: -1,
            worth: stats.worth,
            moves_per_turn: stats.moves_per_turn,
            effects: Arc::from(Vec::new()),
        }
    }

    /// Health including every stat layer.
    pub fn effective_health(&self) -> i32 {
        self.effects
            .iter()
            .filter_map(|e| e.stats)
            .fold(self.health, |acc, s| acc.saturating_add(s.health))
    }

    /// Damage including every stat layer, never below zero.
    pub fn effective_damage(&self) -> i32 {
        self.effects
            .iter()
            .filter_map(|e| e.stats)
            .fold(self.damage, |acc, s| acc.saturating_add(s.damage))
            .max(0)
    }

    /// False while any active effect forbids attacking this unit.
    pub fn can_be_attacked(&self) -> bool {
        self.effects.iter().all(|e| e.can_be_attacked)
    }

    /// Longest remaining duration among effects that forbid attacks.
    /// Permanent protection reports `i32::MAX`.
    pub fn invulnerable_turns(&self) -> i32 {
        self.effects
            .iter()
            .filter(|e| !e.can_be_attacked)
            .map(|e| match e.duration {
                DurationKind::Permanent => i32::MAX,
                _ => e.remaining.max(0),
            })
            .max()
            .unwrap_or(0)
    }

    /// Summed thorns percentage, capped at 100.
    pub fn thorns(&self) -> u32 {
        let pct: u32 = self.effects.iter().filter_map(|e| e.thorns).map(u32::from).sum();
        pct.min(100)
    }

    /// True when an effect with id `effect` is active.
    pub fn has_effect(&self, effect: EffectId) -> bool {
        self.effects.iter().any(|e| e.effect == effect)
    }

    /// Returns a copy with `effect` appended.
    pub fn with_effect(&self, effect: UnitEffectSnapshot) -> UnitSnapshot {
        let mut effects: Vec<UnitEffectSnapshot> = self.effects.to_vec();
        effects.push(effect);
        UnitSnapshot {
            effects: Arc::from(effects),
            ..self.clone()
        }
    }

    /// Returns the unit after it finishes a turn, or None once its lifetime
    /// runs out.
    pub fn tick(&self) -> Option<UnitSnapshot> {
        let lifetime = if self.lifetime > 0 {
            self.lifetime - 1
        } else {
            self.lifetime
        };
        if lifetime == 0 {
            return None;
        }
        let effects: Vec<UnitEffectSnapshot> = self.effects.iter().filter_map(|e| e.tick()).collect();
        let effects = if effects.len() == self.effects.len() && effects[..] == self.effects[..] {
            Arc::clone(&self.effects)
        } else {
            Arc::from(effects)
        };
        Some(UnitSnapshot {
            lifetime,
            effects,
            ..self.clone()
        })
    }
}
