//! Square tile grid, move directions and the slide/merge transform

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, ParseDirectionError};

/// Cells per row and per column
pub const BOARD_SIZE: usize = 4;

/// Tile value that wins the game
pub const WIN_VALUE: u32 = 2048;

/// Largest tile reachable on a 4x4 board (2^17); boards built from input may
/// not hold anything bigger, which keeps every later merge far from `u32::MAX`
pub const MAX_TILE: u32 = 1 << 17;

/// Values a new tile can take, picked with equal probability
pub const SPAWN_VALUES: [u32; 2] = [2, 4];

/// One row or column, leading edge first
pub type Line = [u32; BOARD_SIZE];

/// Move direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map a raw key symbol to a direction; `None` means "ignore this key"
    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }

    /// Single-letter code used in move scripts
    pub fn letter(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    /// Coordinates of line `index` in merge order.
    ///
    /// Tiles slide towards the first coordinate, so every direction reduces
    /// to a left merge over the returned view.
    fn line_cells(self, index: usize) -> [(usize, usize); BOARD_SIZE] {
        std::array::from_fn(|step| match self {
            Direction::Left => (index, step),
            Direction::Right => (index, BOARD_SIZE - 1 - step),
            Direction::Up => (step, index),
            Direction::Down => (BOARD_SIZE - 1 - step, index),
        })
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        let direction = match key.to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "u" => Direction::Up,
            "down" | "arrowdown" | "d" => Direction::Down,
            "left" | "arrowleft" | "l" => Direction::Left,
            "right" | "arrowright" | "r" => Direction::Right,
            _ => return Err(ParseDirectionError(key.to_string())),
        };
        Ok(direction)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        f.pad(name)
    }
}

/// A tile placed by [`Board::spawn_tile`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// Check the tile invariant: empty, or a power of two in `2..=MAX_TILE`
pub fn is_valid_tile(value: u32) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

/// Drop zeros, keeping order, and pad on the right
fn compact(line: Line) -> Line {
    let mut packed = [0; BOARD_SIZE];
    for (slot, value) in packed.iter_mut().zip(line.into_iter().filter(|&v| v != 0)) {
        *slot = value;
    }
    packed
}

/// Slide and merge one line towards index 0.
///
/// Each adjacent equal pair merges once, scanning forward; a freshly doubled
/// tile is not merged again in the same pass, so `[2, 2, 2, 0]` becomes
/// `[4, 2, 0, 0]`.
pub fn merge_line(line: Line) -> Line {
    let mut line = compact(line);
    for i in 0..BOARD_SIZE - 1 {
        if line[i] != 0 && line[i] == line[i + 1] {
            line[i] *= 2;
            line[i + 1] = 0;
        }
    }
    compact(line)
}

/// The N x N grid (row-major, 0 = empty)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[u32; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub const EMPTY: Board = Board {
        cells: [[0; BOARD_SIZE]; BOARD_SIZE],
    };

    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Build a board from rows. Tile values are only checked in debug builds.
    pub fn from_rows(rows: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        debug_assert!(
            rows.iter().flatten().all(|&v| is_valid_tile(v)),
            "board contains a value that is not 0 or a power of two in 2..=MAX_TILE"
        );
        Self { cells: rows }
    }

    /// Build a board from rows, rejecting invalid tile values
    pub fn try_from_rows(rows: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, BoardError> {
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(BoardError::InvalidTile { row, col, value });
                }
            }
        }
        Ok(Self { cells: rows })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Value at (row, col); 0 when empty
    pub fn cell_value(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    /// Full grid snapshot
    pub fn rows(&self) -> &[[u32; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Coordinates of all empty cells, row-major
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empty = Vec::new();
        for (row, values) in self.cells.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value == 0 {
                    empty.push((row, col));
                }
            }
        }
        empty
    }

    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v != 0).count()
    }

    /// Sum of all tile values
    pub fn sum(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    /// Largest tile, 0 on an empty board
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    // ========================================================================
    // STATE TRANSITIONS
    // ========================================================================

    /// Clear the grid and place two random tiles
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::EMPTY;
        self.spawn_tile(rng);
        self.spawn_tile(rng);
    }

    /// Put a 2 or a 4 (even odds) on a uniformly chosen empty cell.
    ///
    /// Returns `None` and leaves the board alone when it is full.
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Spawn> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }

        let (row, col) = empty[rng.gen_range(0..empty.len())];
        let value = SPAWN_VALUES[rng.gen_range(0..SPAWN_VALUES.len())];
        self.cells[row][col] = value;

        Some(Spawn { row, col, value })
    }

    /// Slide and merge every line towards `direction`.
    ///
    /// Returns whether any cell changed. A `false` result leaves the board
    /// untouched and must not be followed by a spawn.
    pub fn apply_move(&mut self, direction: Direction) -> bool {
        let mut changed = false;

        for index in 0..BOARD_SIZE {
            let coords = direction.line_cells(index);
            let line = coords.map(|(row, col)| self.cells[row][col]);
            let merged = merge_line(line);

            if merged != line {
                changed = true;
                for ((row, col), value) in coords.into_iter().zip(merged) {
                    self.cells[row][col] = value;
                }
            }
        }

        changed
    }

    // ========================================================================
    // TERMINAL CHECKS
    // ========================================================================

    /// No empty cell and no adjacent equal pair in either axis
    pub fn is_game_over(&self) -> bool {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let value = self.cells[row][col];
                if value == 0 {
                    return false;
                }
                if row + 1 < BOARD_SIZE && value == self.cells[row + 1][col] {
                    return false;
                }
                if col + 1 < BOARD_SIZE && value == self.cells[row][col + 1] {
                    return false;
                }
            }
        }
        true
    }

    /// Some cell holds the target tile
    pub fn has_won(&self) -> bool {
        self.cells.iter().flatten().any(|&v| v == WIN_VALUE)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, &value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{:>5}", value)?;
                }
            }
        }
        Ok(())
    }
}

/// Parses rows separated by `/` or newlines, cells by whitespace or commas:
/// `"2 2 0 0 / 0 4 0 0 / 0 0 0 0 / 0 0 0 2"`
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .split(|c: char| c == '/' || c == '\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.len() != BOARD_SIZE {
            return Err(BoardError::WrongRowCount { found: lines.len() });
        }

        let mut rows = [[0u32; BOARD_SIZE]; BOARD_SIZE];
        for (row, line) in lines.iter().enumerate() {
            let cells: Vec<&str> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|cell| !cell.is_empty())
                .collect();

            if cells.len() != BOARD_SIZE {
                return Err(BoardError::WrongColumnCount { row, found: cells.len() });
            }

            for (col, cell) in cells.iter().enumerate() {
                rows[row][col] = match *cell {
                    "." => 0,
                    text => text
                        .parse()
                        .map_err(|_| BoardError::InvalidNumber(text.to_string()))?,
                };
            }
        }

        Self::try_from_rows(rows)
    }
}
