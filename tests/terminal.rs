//! Integration tests for terminal detection on the 3x3 board.

use tictactoe_match_web::{detect_terminal, Board, Cell, LineKind, Terminal};

/// Build a board from three rows of `X`, `O` and `-`.
fn board(rows: [&str; 3]) -> Board {
    let mut b = Board::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, ch) in row.chars().enumerate() {
            b.cells[r][c] = match ch {
                'X' => Cell::MarkA,
                'O' => Cell::MarkB,
                _ => Cell::Empty,
            };
        }
    }
    b
}

fn winning_kind(b: &Board) -> Option<(LineKind, Cell)> {
    match detect_terminal(b) {
        Some(Terminal::Decisive { line }) => Some((line.kind, line.mark)),
        _ => None,
    }
}

#[test]
fn empty_board_is_not_terminal() {
    assert_eq!(detect_terminal(&Board::new()), None);
}

#[test]
fn partial_board_without_line_is_not_terminal() {
    assert_eq!(detect_terminal(&board(["XO-", "-X-", "O--"])), None);
}

#[test]
fn detects_every_line() {
    let cases = [
        (["XXX", "OO-", "---"], LineKind::Row(0)),
        (["OO-", "XXX", "---"], LineKind::Row(1)),
        (["OO-", "---", "XXX"], LineKind::Row(2)),
        (["XO-", "XO-", "X--"], LineKind::Column(0)),
        (["OX-", "-X-", "OX-"], LineKind::Column(1)),
        (["O-X", "O-X", "--X"], LineKind::Column(2)),
        (["XO-", "OX-", "--X"], LineKind::Diagonal),
        (["O-X", "OX-", "X--"], LineKind::AntiDiagonal),
    ];
    for (rows, kind) in cases {
        assert_eq!(winning_kind(&board(rows)), Some((kind, Cell::MarkA)), "{rows:?}");
    }
}

#[test]
fn reports_cells_and_owner_of_line() {
    let b = board(["X-O", "XO-", "O-X"]);
    match detect_terminal(&b) {
        Some(Terminal::Decisive { line }) => {
            assert_eq!(line.kind, LineKind::AntiDiagonal);
            assert_eq!(line.cells, [(0, 2), (1, 1), (2, 0)]);
            assert_eq!(line.mark, Cell::MarkB);
        }
        other => panic!("expected decisive, got {other:?}"),
    }
}

#[test]
fn first_line_wins_when_several_are_complete() {
    // Row 0 and column 0 both complete: rows are checked first.
    assert_eq!(
        winning_kind(&board(["XXX", "XOO", "XOO"])),
        Some((LineKind::Row(0), Cell::MarkA))
    );
    // Column 2 (O) and the diagonal (X): columns come before diagonals.
    assert_eq!(
        winning_kind(&board(["X-O", "-XO", "--O"])),
        Some((LineKind::Column(2), Cell::MarkB))
    );
    // Both diagonals: main diagonal first.
    assert_eq!(
        winning_kind(&board(["X-X", "-X-", "X-X"])),
        Some((LineKind::Diagonal, Cell::MarkA))
    );
}

#[test]
fn full_board_without_line_is_draw() {
    assert_eq!(detect_terminal(&board(["XOX", "XOO", "OXX"])), Some(Terminal::Draw));
}

#[test]
fn full_board_with_line_is_decisive_not_draw() {
    assert!(matches!(
        detect_terminal(&board(["XXX", "OOX", "XOO"])),
        Some(Terminal::Decisive { .. })
    ));
}

#[test]
fn board_display_and_counts() {
    let b = board(["X--", "-O-", "--X"]);
    assert_eq!(b.to_string(), "X--\n-O-\n--X");
    assert_eq!(b.mark_count(), 3);
    assert!(!b.is_full());
    assert_eq!(b.get(1, 1), Some(Cell::MarkB));
    assert_eq!(b.get(3, 0), None);
}
