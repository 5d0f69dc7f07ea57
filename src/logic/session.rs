//! History-level intents: starting matches and clearing the record.

use crate::models::{GameState, Match, MatchId};

/// Start a new match between two named players and make it current.
///
/// Both players get fresh ids and zeroed stats; the match opens at round 1 with player 1
/// to move. Earlier matches stay in the history.
pub fn start_match(
    state: &mut GameState,
    player_1_name: impl Into<String>,
    player_2_name: impl Into<String>,
    total_rounds: u32,
) -> MatchId {
    let m = Match::new(player_1_name, player_2_name, total_rounds);
    let id = m.id;
    log::info!(
        "match {} started: {} vs {}, best of {}",
        id,
        m.player_1.name,
        m.player_2.name,
        m.total_rounds
    );
    state.matches.push(m);
    state.current_match = Some(id);
    state.total_matches += 1;
    id
}

/// Drop every match and the current-match pointer.
pub fn clear_history(state: &mut GameState) {
    *state = GameState::new();
}
