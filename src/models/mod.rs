//! Data structures for the game: players, board, rounds, matches and session history.

mod board;
mod game;
mod player;
mod state;

pub(crate) use board::LINES;
pub use board::{Board, Cell, Line, LineKind, Terminal};
pub use game::{Match, MatchId, Outcome, Round, DEFAULT_TOTAL_ROUNDS, WINS_TO_CLINCH};
pub use player::{Player, PlayerId, PlayerStats};
pub use state::GameState;
