//! Effect snapshots attached to units and tiles.

/// Identifies the card effect an effect snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u16);

/// How long an effect lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationKind {
    /// Expires after `remaining` turns of its owner.
    Temporary,
    /// Never expires.
    Permanent,
    /// Expires at the end of the current turn.
    Instant,
}

/// Additive stat modifiers layered over a unit's base stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatLayer {
    pub health: i32,
    pub damage: i32,
}

/// An effect applied to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitEffectSnapshot {
    pub effect: EffectId,
    pub duration: DurationKind,
    pub remaining: i32,
    pub can_be_attacked: bool,
    pub stats: Option<StatLayer>,
    /// Percentage of incoming damage reflected to the attacker.
    pub thorns: Option<u8>,
}

impl UnitEffectSnapshot {
    /// A plain effect with no gameplay modifiers.
    pub fn new(effect: EffectId, duration: DurationKind, remaining: i32) -> Self {
        UnitEffectSnapshot {
            effect,
            duration,
            remaining,
            can_be_attacked: true,
            stats: None,
            thorns: None,
        }
    }

    /// An effect that makes its unit untargetable.
    pub fn invulnerable(effect: EffectId, duration: DurationKind, remaining: i32) -> Self {
        UnitEffectSnapshot {
            can_be_attacked: false,
            ..Self::new(effect, duration, remaining)
        }
    }

    /// Sets the stat layer the effect applies.
    pub fn with_stats(mut self, stats: StatLayer) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Sets the reflected damage percentage.
    pub fn with_thorns(mut self, pct: u8) -> Self {
        self.thorns = Some(pct);
        self
    }

    /// Returns the effect after its owner finishes a turn, or None once expired.
    pub fn tick(&self) -> Option<UnitEffectSnapshot> {
        match self.duration {
            DurationKind::Permanent => Some(*self),
            DurationKind::Instant => None,
            DurationKind::Temporary => {
                let remaining = self.remaining - 1;
                if remaining <= 0 {
                    None
                } else {
                    Some(UnitEffectSnapshot { remaining, ..*self })
                }
            }
        }
    }
}

/// An effect placed on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileEffectSnapshot {
    pub effect: EffectId,
    pub duration: DurationKind,
    pub remaining: i32,
    /// The tile counts as occupied even without a unit (e.g. a barrier).
    pub occupies_tile: bool,
}

impl TileEffectSnapshot {
    /// Creates a tile effect. `occupies_tile` makes the tile impassable.
    pub fn new(effect: EffectId, duration: DurationKind, remaining: i32, occupies_tile: bool) -> Self {
        TileEffectSnapshot {
            effect,
            duration,
            remaining,
            occupies_tile,
        }
    }

    /// Returns the effect after a full round, or None once expired.
    pub fn tick(&self) -> Option<TileEffectSnapshot> {
        match self.duration {
            DurationKind::Permanent => Some(*self),
            DurationKind::Instant => None,
            DurationKind::Temporary => {
                let remaining = self.remaining - 1;
                if remaining <= 0 {
                    None
                } else {
                    Some(TileEffectSnapshot { remaining, ..*self })
                }
            }
        }
    }
}
