//! Match and Round: the record a presentation layer reads after every intent.

use crate::models::board::{Board, Cell};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Rounds per match unless configured otherwise.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 5;

/// Round wins that end a match early.
pub const WINS_TO_CLINCH: u32 = 3;

/// State of a round or of a whole match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Ongoing,
    Draw,
    Decisive,
}

/// A finalized round. Never modified once appended to a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based, in play order.
    pub round_num: u32,
    pub outcome: Outcome,
    /// Present only when `outcome` is `Decisive`.
    pub winner: Option<PlayerId>,
    /// Cumulative scores right after this round.
    pub player_1_score: u32,
    pub player_2_score: u32,
}

/// A sequence of rounds between the same two players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub total_rounds: u32,
    /// Round currently being played (1-based).
    pub running_round: u32,
    /// Always equal to `rounds.len()`.
    pub completed_round: u32,
    pub outcome: Outcome,
    /// Plays `Cell::MarkA` and always opens a round.
    pub player_1: Player,
    /// Plays `Cell::MarkB`.
    pub player_2: Player,
    pub board: Board,
    pub current_turn: PlayerId,
    pub rounds: Vec<Round>,
    pub final_winner: Option<PlayerId>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Create a match with two fresh players, round 1 seeded and player 1 to move.
    /// A round target of zero is raised to one.
    pub fn new(player_1_name: impl Into<String>, player_2_name: impl Into<String>, total_rounds: u32) -> Self {
        let player_1 = Player::new(player_1_name);
        let player_2 = Player::new(player_2_name);
        Self {
            id: Uuid::new_v4(),
            total_rounds: total_rounds.max(1),
            running_round: 1,
            completed_round: 0,
            outcome: Outcome::Ongoing,
            current_turn: player_1.id,
            player_1,
            player_2,
            board: Board::new(),
            rounds: Vec::new(),
            final_winner: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Player by id (either side).
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        [&self.player_1, &self.player_2].into_iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        [&mut self.player_1, &mut self.player_2]
            .into_iter()
            .find(|p| p.id == id)
    }

    /// Display name for an id; empty when the id is not part of this match.
    pub fn player_name(&self, id: PlayerId) -> &str {
        self.player(id).map(|p| p.name.as_str()).unwrap_or("")
    }

    /// The mark a player places, or `None` for an unknown id.
    pub fn mark_of(&self, id: PlayerId) -> Option<Cell> {
        if id == self.player_1.id {
            Some(Cell::MarkA)
        } else if id == self.player_2.id {
            Some(Cell::MarkB)
        } else {
            None
        }
    }

    /// The player owning a mark.
    pub fn player_with_mark(&self, mark: Cell) -> Option<&Player> {
        match mark {
            Cell::MarkA => Some(&self.player_1),
            Cell::MarkB => Some(&self.player_2),
            Cell::Empty => None,
        }
    }

    /// The other participant.
    pub fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        if id == self.player_1.id {
            Some(self.player_2.id)
        } else if id == self.player_2.id {
            Some(self.player_1.id)
        } else {
            None
        }
    }

    /// True once a Round record exists for the running round.
    pub fn is_round_complete(&self) -> bool {
        self.rounds.iter().any(|r| r.round_num == self.running_round)
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Winner of the running round, if it is finalized and decisive.
    pub fn round_winner(&self) -> Option<PlayerId> {
        if !self.is_round_complete() {
            return None;
        }
        self.last_round().and_then(|r| r.winner)
    }

    /// True if the running round is finalized as a draw.
    pub fn is_draw_round(&self) -> bool {
        self.is_round_complete() && self.last_round().is_some_and(|r| r.outcome == Outcome::Draw)
    }

    /// Number of drawn rounds so far (shared by both players).
    pub fn draws(&self) -> u32 {
        self.rounds
            .iter()
            .filter(|r| r.outcome == Outcome::Draw)
            .count() as u32
    }

    /// The player credited with the match, once decided.
    pub fn final_winner_player(&self) -> Option<&Player> {
        self.final_winner.and_then(|id| self.player(id))
    }

    /// True when the match has concluded (decisive or drawn).
    pub fn is_over(&self) -> bool {
        self.outcome != Outcome::Ongoing
    }
}
