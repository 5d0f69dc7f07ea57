//! GameState: match history plus the match currently being played.

use crate::models::game::{Match, MatchId};
use serde::{Deserialize, Serialize};

/// Everything one browser session owns. Serializes to plain data.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Matches started since the last clear (never decremented otherwise).
    pub total_matches: u32,
    /// Every match in start order, the current one included.
    pub matches: Vec<Match>,
    /// Id of the match intents apply to.
    pub current_match: Option<MatchId>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The match currently being played, if any.
    pub fn current_match(&self) -> Option<&Match> {
        let id = self.current_match?;
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn current_match_mut(&mut self) -> Option<&mut Match> {
        let id = self.current_match?;
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Look up any match in the history.
    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }
}
