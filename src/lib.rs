//! Multi-round tic-tac-toe web app: library with models, match engine and persistence.

mod error;
pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    clear_history, complete_round, detect_terminal, leaderboard, next_round, place_mark,
    play_turn, reset_board, restart_match, session_stats, start_match, write_leaderboard_csv,
    LeaderboardEntry, SessionStats,
};
pub use models::{
    Board, Cell, GameState, Line, LineKind, Match, MatchId, Outcome, Player, PlayerId,
    PlayerStats, Round, Terminal, DEFAULT_TOTAL_ROUNDS, WINS_TO_CLINCH,
};
pub use storage::{PersistedSession, SessionId, Snapshot, StoreError};
