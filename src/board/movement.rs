//! Movement rule data.
//!
//! Every archetype moves by a list of rules written from the Player's point of
//! view (+Y is forward). The resolver mirrors Y for the Boss.

use std::sync::LazyLock;

use super::unit::UnitKind;

/// One direction a unit may travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovementRule {
    pub dx: i16,
    pub dy: i16,
    /// At least 1.
    pub max_steps: u8,
    /// Jumps land on exactly `origin + (dx, dy)` and ignore the cells between.
    pub jump: bool,
    pub to_empty: bool,
    pub capture: bool,
}

impl MovementRule {
    /// Creates a rule; `max_steps` values below 1 are clamped to 1.
    pub fn new(dx: i16, dy: i16, max_steps: i32, jump: bool, to_empty: bool, capture: bool) -> Self {
        MovementRule {
            dx,
            dy,
            max_steps: max_steps.clamp(1, u8::MAX as i32) as u8,
            jump,
            to_empty,
            capture,
        }
    }

    /// Creates a rule that slides along `(dx, dy)` for up to `max_steps` cells.
    pub fn slide(dx: i16, dy: i16, max_steps: i32) -> Self {
        Self::new(dx, dy, max_steps, false, true, true)
    }

    /// Creates a rule that jumps to `origin + (dx, dy)`.
    pub fn jump(dx: i16, dy: i16) -> Self {
        Self::new(dx, dy, 1, true, true, true)
    }
}

/// The complete rule set of an archetype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementDefinition {
    pub rules: Vec<MovementRule>,
}

/// Slide length of the sliding presets.
pub const SLIDE_RANGE: i32 = 16;

const ORTHOGONAL: [(i16, i16); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i16, i16); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT: [(i16, i16); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

fn slides(dirs: &[(i16, i16)], steps: i32) -> impl Iterator<Item = MovementRule> + '_ {
    dirs.iter().map(move |&(dx, dy)| MovementRule::slide(dx, dy, steps))
}

static PAWN: LazyLock<MovementDefinition> = LazyLock::new(|| MovementDefinition {
    rules: vec![
        MovementRule::new(0, 1, 1, false, true, false),
        MovementRule::new(1, 1, 1, true, false, true),
        MovementRule::new(-1, 1, 1, true, false, true),
    ],
});

static KNIGHT_RULES: LazyLock<MovementDefinition> = LazyLock::new(|| MovementDefinition {
    rules: KNIGHT.iter().map(|&(dx, dy)| MovementRule::jump(dx, dy)).collect(),
});

static BISHOP: LazyLock<MovementDefinition> = LazyLock::new(|| MovementDefinition {
    rules: slides(&DIAGONAL, SLIDE_RANGE).collect(),
});

static ROOK: LazyLock<MovementDefinition> = LazyLock::new(|| MovementDefinition {
    rules: slides(&ORTHOGONAL, SLIDE_RANGE).collect(),
});

static QUEEN: LazyLock<MovementDefinition> = LazyLock::new(|| MovementDefinition {
    rules: slides(&ORTHOGONAL, SLIDE_RANGE)
        .chain(slides(&DIAGONAL, SLIDE_RANGE))
        .collect(),
});

static KING: LazyLock<MovementDefinition> = LazyLock::new(|| MovementDefinition {
    rules: slides(&ORTHOGONAL, 1).chain(slides(&DIAGONAL, 1)).collect(),
});

impl UnitKind {
    /// Returns the archetype's movement rules.
    pub fn movement(self) -> &'static MovementDefinition {
        match self {
            UnitKind::Pawn => &*PAWN,
            UnitKind::Knight => &*KNIGHT_RULES,
            UnitKind::Bishop => &*BISHOP,
            UnitKind::Rook => &*ROOK,
            UnitKind::Queen => &*QUEEN,
            UnitKind::King => &*KING,
        }
    }
}
