//! Game business logic: the match engine, terminal detection and leaderboard.

mod leaderboard;
mod rounds;
mod session;
mod terminal;

pub use leaderboard::{leaderboard, session_stats, write_leaderboard_csv, LeaderboardEntry, SessionStats};
pub use rounds::{complete_round, next_round, place_mark, play_turn, reset_board, restart_match};
pub use session::{clear_history, start_match};
pub use terminal::detect_terminal;
