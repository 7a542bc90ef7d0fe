//! Board coordinates and sides.
//!
//! Rows grow toward the Boss: the Player's back row is row 0 and the Boss's
//! back row is the last row of the board.

use std::fmt;

/// One of the two opposing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Player,
    Boss,
}

impl Team {
    /// Returns the opposing side.
    pub const fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Boss,
            Team::Boss => Team::Player,
        }
    }

    /// Sign applied to a movement rule's Y component.
    pub const fn forward(self) -> i16 {
        match self {
            Team::Player => 1,
            Team::Boss => -1,
        }
    }

    /// Returns the row this side spawns on for a board with `rows` rows.
    pub const fn home_row(self, rows: u8) -> u8 {
        match self {
            Team::Player => 0,
            Team::Boss => rows.saturating_sub(1),
        }
    }

    /// Number of rows the given row lies ahead of this side's home row.
    pub const fn progress(self, row: u8, rows: u8) -> u8 {
        match self {
            Team::Player => row,
            Team::Boss => rows.saturating_sub(1).saturating_sub(row),
        }
    }

    /// Returns the single-character notation abbreviation.
    pub const fn notation_char(self) -> char {
        match self {
            Team::Player => 'p',
            Team::Boss => 'b',
        }
    }

    /// Parses a team from its notation abbreviation.
    pub fn from_notation_char(c: char) -> Option<Team> {
        match c {
            'p' => Some(Team::Player),
            'b' => Some(Team::Boss),
            _ => None,
        }
    }
}

/// A board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile {
    pub row: u8,
    pub col: u8,
}

impl Tile {
    /// Creates a tile at `row`, `col` (both 0-based).
    pub const fn new(row: u8, col: u8) -> Self {
        Tile { row, col }
    }

    /// Returns the tile displaced by `(dx, dy)`, or None when it falls off a
    /// `rows` x `cols` board.
    pub fn offset(self, dx: i16, dy: i16, rows: u8, cols: u8) -> Option<Tile> {
        let row = self.row as i16 + dy;
        let col = self.col as i16 + dx;
        if row < 0 || col < 0 || row >= rows as i16 || col >= cols as i16 {
            return None;
        }
        Some(Tile::new(row as u8, col as u8))
    }

    /// Row-major index into a board with `cols` columns.
    #[inline]
    pub fn index(self, cols: u8) -> usize {
        self.row as usize * cols as usize + self.col as usize
    }

    /// Parses an algebraic square such as `a1` (col 0, row 0) or `c12`.
    pub fn from_algebraic(s: &str) -> Option<Tile> {
        let mut chars = s.chars();
        let file = chars.next()?;
        if !file.is_ascii_lowercase() {
            return None;
        }
        let rank: u16 = chars.as_str().parse().ok()?;
        if rank == 0 || rank > u8::MAX as u16 {
            return None;
        }
        Some(Tile::new((rank - 1) as u8, file as u8 - b'a'))
    }
}

impl fmt::Display for Tile {
    /// Formats the tile in algebraic form. Columns past `z` have no file
    /// letter and print as `r<row>c<col>`, both 1-based.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.col < 26 {
            write!(f, "{}{}", (b'a' + self.col) as char, self.row as u16 + 1)
        } else {
            write!(f, "r{}c{}", self.row as u16 + 1, self.col as u16 + 1)
        }
    }
}
