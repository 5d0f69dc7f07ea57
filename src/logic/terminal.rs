//! Terminal detection: has the board produced a winner or filled up?

use crate::models::{Board, Line, Terminal, LINES};

/// Check the eight lines in fixed order (rows, columns, diagonal, anti-diagonal) and report
/// the first one holding three equal marks. A full board without such a line is a draw.
/// Returns `None` while the round can still continue.
pub fn detect_terminal(board: &Board) -> Option<Terminal> {
    let winning = LINES.iter().find_map(|&(kind, cells)| {
        let [a, b, c] = cells.map(|(r, col)| board.cells[r][col]);
        (!a.is_empty() && a == b && a == c).then_some(Line {
            kind,
            cells,
            mark: a,
        })
    });
    match winning {
        Some(line) => Some(Terminal::Decisive { line }),
        None if board.is_full() => Some(Terminal::Draw),
        None => None,
    }
}
