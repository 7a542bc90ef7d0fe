//! Board movement resolver.
//!
//! Turns a unit's movement rules into the set of tiles it may legally end on,
//! given the current occupancy. Pure: reads the board, never changes it.

use crate::board::{MovementDefinition, Occupancy, Team, Tile, UnitSnapshot};

/// What a rule sees when it looks at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    /// A tile effect occupies the cell without a unit.
    Blocked,
    Friendly,
    Enemy { capturable: bool },
}

fn classify<O: Occupancy + ?Sized>(board: &O, tile: Tile, team: Team) -> Cell {
    match board.occupant(tile) {
        Some(occ) if occ.team == team => Cell::Friendly,
        Some(occ) => Cell::Enemy {
            capturable: occ.can_be_attacked,
        },
        None if board.is_blocked(tile) => Cell::Blocked,
        None => Cell::Empty,
    }
}

/// Walks every rule from `origin`, reporting each reachable tile.
///
/// `pretend_enemy` makes one tile read as a capturable enemy regardless of
/// what is really there.
fn destinations<O: Occupancy + ?Sized>(
    board: &O,
    team: Team,
    origin: Tile,
    definition: &MovementDefinition,
    pretend_enemy: Option<Tile>,
) -> Vec<Tile> {
    let rows = board.rows();
    let cols = board.cols();
    let look = |tile: Tile| {
        if pretend_enemy == Some(tile) {
            Cell::Enemy { capturable: true }
        } else {
            classify(board, tile, team)
        }
    };

    let mut out: Vec<Tile> = Vec::new();
    let mut push = |tile: Tile| {
        if !out.contains(&tile) {
            out.push(tile);
        }
    };

    for rule in &definition.rules {
        let dx = rule.dx;
        let dy = rule.dy * team.forward();

        if rule.jump {
            let Some(target) = origin.offset(dx, dy, rows, cols) else {
                continue;
            };
            match look(target) {
                Cell::Empty if rule.to_empty => push(target),
                Cell::Enemy { capturable: true } if rule.capture => push(target),
                _ => {}
            }
            continue;
        }

        for step in 1..=rule.max_steps as i16 {
            let Some(target) = origin.offset(dx * step, dy * step, rows, cols) else {
                break;
            };
            match look(target) {
                Cell::Empty => {
                    if rule.to_empty {
                        push(target);
                    }
                }
                Cell::Blocked | Cell::Friendly => break,
                Cell::Enemy { capturable } => {
                    if capturable && rule.capture {
                        push(target);
                    }
                    break;
                }
            }
        }
    }

    out
}

/// Returns every tile `unit` may move to under `definition`.
///
/// A unit without a position has no moves.
pub fn legal_moves<O: Occupancy + ?Sized>(
    board: &O,
    unit: &UnitSnapshot,
    definition: &MovementDefinition,
) -> Vec<Tile> {
    let Some(origin) = unit.position else {
        tracing::warn!(unit = unit.id.0, "unit has no position, no legal moves");
        return Vec::new();
    };
    destinations(board, unit.team, origin, definition, None)
}

/// Returns true if `unit` could capture on `target` were an attackable enemy
/// standing there. Used to count defenders of a tile.
pub fn threatens<O: Occupancy + ?Sized>(
    board: &O,
    unit: &UnitSnapshot,
    definition: &MovementDefinition,
    target: Tile,
) -> bool {
    let Some(origin) = unit.position else {
        return false;
    };
    if origin == target {
        return false;
    }
    destinations(board, unit.team, origin, definition, Some(target)).contains(&target)
}
