//! Leaderboard and session overview, aggregated over the match history.

use crate::error::StoreError;
use crate::models::{GameState, Outcome};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;

const CSV_HEADER: [&str; 7] = [
    "name",
    "points",
    "wins",
    "losses",
    "draws",
    "matches_played",
    "matches_won",
];

/// One row of the leaderboard: a player name's totals across every match played.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub matches_played: u32,
    pub matches_won: u32,
}

/// Overview numbers for the whole session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub matches_played: u32,
    /// Matches that ended with a final winner.
    pub matches_decided: u32,
    /// Finalized rounds across all matches.
    pub total_rounds: u32,
}

/// Build the leaderboard. Players are grouped by name (ids are per match), sorted by
/// points, then round wins, then name.
pub fn leaderboard(state: &GameState) -> Vec<LeaderboardEntry> {
    let mut by_name: HashMap<&str, LeaderboardEntry> = HashMap::new();
    for m in &state.matches {
        let draws = m.draws();
        for p in [&m.player_1, &m.player_2] {
            let e = by_name.entry(p.name.as_str()).or_insert_with(|| LeaderboardEntry {
                name: p.name.clone(),
                ..Default::default()
            });
            e.points += p.score;
            e.wins += p.wins;
            e.losses += p.losses;
            e.draws += draws;
            e.matches_played += 1;
            if m.final_winner == Some(p.id) {
                e.matches_won += 1;
            }
        }
    }
    let mut entries: Vec<_> = by_name.into_values().collect();
    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.wins.cmp(&a.wins))
            .then_with(|| a.name.cmp(&b.name))
    });
    entries
}

pub fn session_stats(state: &GameState) -> SessionStats {
    SessionStats {
        matches_played: state.matches.len() as u32,
        matches_decided: state
            .matches
            .iter()
            .filter(|m| m.outcome == Outcome::Decisive)
            .count() as u32,
        total_rounds: state.matches.iter().map(|m| m.completed_round).sum(),
    }
}

/// Write the leaderboard as CSV. The header row is always written, even with no entries.
pub fn write_leaderboard_csv<W: Write>(state: &GameState, out: W) -> Result<(), StoreError> {
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    w.write_record(CSV_HEADER)?;
    for e in leaderboard(state) {
        w.write_record([
            e.name,
            e.points.to_string(),
            e.wins.to_string(),
            e.losses.to_string(),
            e.draws.to_string(),
            e.matches_played.to_string(),
            e.matches_won.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
