//! Board notation encoding and decoding.
//!
//! A compact one-line string for a whole position, in the spirit of chess FEN.
//!
//! Format: `<rows>x<cols>/<player_hp>/<units>/<tile_effects>`
//!
//! - units: comma separated `<team><kind><square>[:<attr>...]`, team `p` or
//!   `b`, kind one of `P N B R Q K`, square algebraic (`a1` is row 0, col 0).
//!   Attributes override archetype defaults: `h<n>` health, `d<n>` damage,
//!   `l<n>` lifetime (`l-1` infinite), `w<x>` worth, `m<n>` moves per turn,
//!   `u<n>` unattackable for n turns, `u*` unattackable, `t<n>` thorns percent.
//! - tile effects: comma separated `#<square>` (blocking) or `~<square>`
//!   (non-blocking), with `:<n>` for an n-turn effect; permanent otherwise.
//!
//! `-` marks an empty section. Example:
//! `8x8/20/bRa8,bPd5:l2,pNc2:u1/#d4:2,~e4`

use std::fmt::Write as _;

use crate::board::{
    DurationKind, EffectId, GameState, Occupancy, Team, Tile, TileEffectSnapshot,
    UnitEffectSnapshot, UnitKind, UnitSnapshot,
};

/// Effect id given to `u` attributes.
pub const SHIELD_EFFECT: EffectId = EffectId(900);
/// Effect id given to `t` attributes.
pub const THORNS_EFFECT: EffectId = EffectId(901);
/// Effect id given to `#` tile effects.
pub const BARRIER_EFFECT: EffectId = EffectId(910);
/// Effect id given to `~` tile effects.
pub const MARK_EFFECT: EffectId = EffectId(911);

/// Columns are lettered `a` to `z`.
const MAX_COLS: u8 = 26;

/// Errors that can occur during notation parsing.
#[derive(Debug, thiserror::Error)]
pub enum NotationError {
    #[error("expected 4 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("invalid board dimensions: '{0}'")]
    InvalidDimensions(String),

    #[error("invalid player hp: '{0}'")]
    InvalidPlayerHp(String),

    #[error("invalid team character: '{0}'")]
    InvalidTeam(char),

    #[error("invalid unit kind character: '{0}'")]
    InvalidKind(char),

    #[error("invalid square: '{0}'")]
    InvalidSquare(String),

    #[error("square '{0}' is off the board")]
    OffBoard(String),

    #[error("duplicate unit at square '{0}'")]
    DuplicateUnit(String),

    #[error("invalid unit entry: '{0}'")]
    InvalidUnitEntry(String),

    #[error("invalid unit attribute: '{0}'")]
    InvalidAttribute(String),

    #[error("invalid tile effect entry: '{0}'")]
    InvalidTileEffect(String),
}

fn parse_dimensions(s: &str) -> Result<(u8, u8), NotationError> {
    let err = || NotationError::InvalidDimensions(s.to_string());
    let (rows, cols) = s.split_once('x').ok_or_else(err)?;
    let rows: u8 = rows.parse().map_err(|_| err())?;
    let cols: u8 = cols.parse().map_err(|_| err())?;
    if rows == 0 || cols == 0 || cols > MAX_COLS {
        return Err(err());
    }
    Ok((rows, cols))
}

fn parse_square(s: &str, state: &GameState) -> Result<Tile, NotationError> {
    let tile = Tile::from_algebraic(s).ok_or_else(|| NotationError::InvalidSquare(s.to_string()))?;
    if !state.contains(tile) {
        return Err(NotationError::OffBoard(s.to_string()));
    }
    Ok(tile)
}

fn parse_attribute(attr: &str, unit: &mut UnitSnapshot) -> Result<(), NotationError> {
    let err = || NotationError::InvalidAttribute(attr.to_string());
    let mut chars = attr.chars();
    let key = chars.next().ok_or_else(err)?;
    let value = chars.as_str();

    match key {
        'h' => unit.health = value.parse().map_err(|_| err())?,
        'd' => unit.damage = value.parse().map_err(|_| err())?,
        'l' => {
            let lifetime: i32 = value.parse().map_err(|_| err())?;
            if lifetime == 0 || lifetime < -1 {
                return Err(err());
            }
            unit.lifetime = lifetime;
        }
        'w' => unit.worth = value.parse().map_err(|_| err())?,
        'm' => unit.moves_per_turn = value.parse().map_err(|_| err())?,
        'u' => {
            let shield = if value == "*" {
                UnitEffectSnapshot::invulnerable(SHIELD_EFFECT, DurationKind::Permanent, 0)
            } else {
                let turns: i32 = value.parse().map_err(|_| err())?;
                if turns <= 0 {
                    return Err(err());
                }
                UnitEffectSnapshot::invulnerable(SHIELD_EFFECT, DurationKind::Temporary, turns)
            };
            *unit = unit.with_effect(shield);
        }
        't' => {
            let pct: u8 = value.parse().map_err(|_| err())?;
            if pct > 100 {
                return Err(err());
            }
            let thorns = UnitEffectSnapshot::new(THORNS_EFFECT, DurationKind::Permanent, 0).with_thorns(pct);
            *unit = unit.with_effect(thorns);
        }
        _ => return Err(err()),
    }
    Ok(())
}

/// Parses the units section. Entries get ids in the order they appear.
fn parse_units(s: &str, mut state: GameState) -> Result<GameState, NotationError> {
    if s == "-" {
        return Ok(state);
    }
    for entry in s.split(',') {
        let mut parts = entry.split(':');
        let head = parts.next().unwrap_or_default();
        let mut chars = head.chars();
        let (Some(team_ch), Some(kind_ch)) = (chars.next(), chars.next()) else {
            return Err(NotationError::InvalidUnitEntry(entry.to_string()));
        };
        let team = Team::from_notation_char(team_ch).ok_or(NotationError::InvalidTeam(team_ch))?;
        let kind = UnitKind::from_notation_char(kind_ch).ok_or(NotationError::InvalidKind(kind_ch))?;
        let square = chars.as_str();
        let tile = parse_square(square, &state)?;
        if state.unit_at(tile).is_some() {
            return Err(NotationError::DuplicateUnit(square.to_string()));
        }

        let mut unit = UnitSnapshot::new(state.next_unit_id(), team, kind, tile);
        for attr in parts {
            parse_attribute(attr, &mut unit)?;
        }
        state = state.with_unit(unit);
    }
    Ok(state)
}

fn parse_tile_effects(s: &str, mut state: GameState) -> Result<GameState, NotationError> {
    if s == "-" {
        return Ok(state);
    }
    for entry in s.split(',') {
        let err = || NotationError::InvalidTileEffect(entry.to_string());
        let (occupies, effect_id, rest) = match entry.chars().next() {
            Some('#') => (true, BARRIER_EFFECT, &entry[1..]),
            Some('~') => (false, MARK_EFFECT, &entry[1..]),
            _ => return Err(err()),
        };
        let (square, turns) = match rest.split_once(':') {
            Some((sq, n)) => (sq, Some(n.parse::<i32>().map_err(|_| err())?)),
            None => (rest, None),
        };
        let tile = parse_square(square, &state)?;
        let effect = match turns {
            Some(n) if n > 0 => TileEffectSnapshot::new(effect_id, DurationKind::Temporary, n, occupies),
            Some(_) => return Err(err()),
            None => TileEffectSnapshot::new(effect_id, DurationKind::Permanent, 0, occupies),
        };
        let mut effects = state.tile_effects(tile).to_vec();
        effects.push(effect);
        state = state.with_tile_effects(tile, effects);
    }
    Ok(state)
}

/// Parses a position string into a `GameState`.
pub fn parse_position(s: &str) -> Result<GameState, NotationError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    if sections.len() != 4 {
        return Err(NotationError::WrongSectionCount(sections.len()));
    }

    let (rows, cols) = parse_dimensions(sections[0])?;
    let player_hp: i32 = sections[1]
        .parse()
        .map_err(|_| NotationError::InvalidPlayerHp(sections[1].to_string()))?;

    let state = GameState::new(rows, cols, player_hp);
    let state = parse_units(sections[2], state)?;
    parse_tile_effects(sections[3], state)
}

fn encode_unit(unit: &UnitSnapshot, out: &mut String) {
    let Some(tile) = unit.position else {
        return;
    };
    let base = unit.kind.base_stats();
    let _ = write!(out, "{}{}{}", unit.team.notation_char(), unit.kind.notation_char(), tile);
    if unit.health != base.health {
        let _ = write!(out, ":h{}", unit.health);
    }
    if unit.damage != base.damage {
        let _ = write!(out, ":d{}", unit.damage);
    }
    if unit.lifetime != -1 {
        let _ = write!(out, ":l{}", unit.lifetime);
    }
    if unit.worth != base.worth {
        let _ = write!(out, ":w{}", unit.worth);
    }
    if unit.moves_per_turn != base.moves_per_turn {
        let _ = write!(out, ":m{}", unit.moves_per_turn);
    }
    for effect in unit.effects.iter() {
        if !effect.can_be_attacked {
            match effect.duration {
                DurationKind::Permanent => out.push_str(":u*"),
                _ => {
                    let _ = write!(out, ":u{}", effect.remaining);
                }
            }
        }
        if let Some(pct) = effect.thorns {
            let _ = write!(out, ":t{}", pct);
        }
    }
}

/// Encodes a `GameState` into a position string.
///
/// Units off the board and stat-layer effects have no notation and are
/// dropped.
pub fn format_position(state: &GameState) -> String {
    let mut out = format!("{}x{}/{}/", state.rows(), state.cols(), state.player_hp());

    let units: Vec<String> = state
        .units()
        .iter()
        .filter(|u| u.position.is_some())
        .map(|u| {
            let mut s = String::new();
            encode_unit(u, &mut s);
            s
        })
        .collect();
    out.push_str(&if units.is_empty() { "-".to_string() } else { units.join(",") });
    out.push('/');

    let mut effects = Vec::new();
    for tile in state.tiles() {
        for effect in state.tile_effects(tile) {
            let marker = if effect.occupies_tile { '#' } else { '~' };
            match effect.duration {
                DurationKind::Temporary => effects.push(format!("{marker}{tile}:{}", effect.remaining)),
                _ => effects.push(format!("{marker}{tile}")),
            }
        }
    }
    out.push_str(&if effects.is_empty() { "-".to_string() } else { effects.join(",") });
    out
}
