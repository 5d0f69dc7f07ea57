//! Player and PlayerStats data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in rounds, turns and lookups).
pub type PlayerId = Uuid;

/// Statistics view of a player within one match (for API / display).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub score: u32,
    pub wins: u32,
    pub losses: u32,
}

impl PlayerStats {
    pub fn from_player(p: &Player) -> Self {
        Self {
            score: p.score,
            wins: p.wins,
            losses: p.losses,
        }
    }
}

/// One of the two participants of a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// 2 points per round won, 1 per round lost, nothing for a draw.
    pub score: u32,
    /// Rounds won in this match.
    pub wins: u32,
    /// Rounds lost in this match.
    pub losses: u32,
}

impl Player {
    /// Points awarded to the winner of a decisive round.
    pub const WIN_POINTS: u32 = 2;
    /// Points awarded to the loser of a decisive round.
    pub const LOSS_POINTS: u32 = 1;

    /// Create a new player with a fresh id. Names are taken as given.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            score: 0,
            wins: 0,
            losses: 0,
        }
    }

    /// Current stats as a separate struct (for API responses).
    pub fn stats(&self) -> PlayerStats {
        PlayerStats::from_player(self)
    }

    /// Record a round win for this player.
    pub fn add_win(&mut self) {
        self.wins += 1;
        self.score += Self::WIN_POINTS;
    }

    /// Record a round loss for this player.
    pub fn add_loss(&mut self) {
        self.losses += 1;
        self.score += Self::LOSS_POINTS;
    }

    /// Zero all stats, keeping id and name.
    pub fn reset_stats(&mut self) {
        self.score = 0;
        self.wins = 0;
        self.losses = 0;
    }
}
