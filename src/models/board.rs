//! The 3x3 grid, its cells, and the lines that decide a round.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board.
pub const SIZE: usize = 3;

/// Content of one cell. The first player always owns `MarkA`, the second `MarkB`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    MarkA,
    MarkB,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Display symbol: X for the first player, O for the second.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::MarkA => 'X',
            Cell::MarkB => 'O',
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Which of the eight lines completed a round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

/// Check order: rows top-to-bottom, columns left-to-right, then both diagonals.
pub(crate) const LINES: [(LineKind, [(usize, usize); 3]); 8] = [
    (LineKind::Row(0), [(0, 0), (0, 1), (0, 2)]),
    (LineKind::Row(1), [(1, 0), (1, 1), (1, 2)]),
    (LineKind::Row(2), [(2, 0), (2, 1), (2, 2)]),
    (LineKind::Column(0), [(0, 0), (1, 0), (2, 0)]),
    (LineKind::Column(1), [(0, 1), (1, 1), (2, 1)]),
    (LineKind::Column(2), [(0, 2), (1, 2), (2, 2)]),
    (LineKind::Diagonal, [(0, 0), (1, 1), (2, 2)]),
    (LineKind::AntiDiagonal, [(0, 2), (1, 1), (2, 0)]),
];

/// A completed line: three equal, non-empty cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub kind: LineKind,
    /// (row, col) of each cell in the line.
    pub cells: [(usize, usize); 3],
    /// The mark occupying the line.
    pub mark: Cell,
}

/// Terminal board state: a completed line or a full board without one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum Terminal {
    Decisive { line: Line },
    Draw,
}

/// The 3x3 grid, indexed `[row][col]`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub cells: [[Cell; SIZE]; SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at (row, col); `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Set a cell. Returns false (and changes nothing) if out of range or already marked.
    pub(crate) fn mark(&mut self, row: usize, col: usize, mark: Cell) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) if cell.is_empty() && !mark.is_empty() => {
                *cell = mark;
                true
            }
            _ => false,
        }
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|c| !c.is_empty())
    }

    /// Number of marked cells.
    pub fn mark_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| !c.is_empty()).count()
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            for cell in row {
                write!(f, "{cell}")?;
            }
            if i + 1 < SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
