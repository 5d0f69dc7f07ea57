//! Round lifecycle: placing marks, finalizing rounds, advancing and restarting.
//!
//! Every function here is total. Intents whose preconditions do not hold leave the match
//! untouched and report `false`, mirroring a UI that simply disables illegal input.

use crate::logic::terminal::detect_terminal;
use crate::models::{Match, Outcome, PlayerId, Round, Terminal, WINS_TO_CLINCH};
use chrono::Utc;

/// Place `player_id`'s mark at (row, col) and hand the turn to the other player.
///
/// Ignored when the cell is out of range or occupied, when the running round is already
/// finalized, or when `player_id` is not part of the match. The turn flips even if this move
/// completes the round; detecting that is a separate step.
pub fn place_mark(m: &mut Match, row: usize, col: usize, player_id: PlayerId) -> bool {
    if m.is_round_complete() {
        log::debug!("match {}: round {} already finalized, move ignored", m.id, m.running_round);
        return false;
    }
    let (Some(mark), Some(other)) = (m.mark_of(player_id), m.opponent_of(player_id)) else {
        log::debug!("match {}: unknown player {}, move ignored", m.id, player_id);
        return false;
    };
    if !m.board.mark(row, col, mark) {
        log::debug!("match {}: cell ({}, {}) unavailable, move ignored", m.id, row, col);
        return false;
    }
    m.current_turn = other;
    true
}

/// Finalize the running round and update scores and the match outcome.
///
/// A decisive round gives the winner +1 win and 2 points, the loser +1 loss and 1 point;
/// a draw changes no stats. The match is decided as soon as a player reaches
/// [`WINS_TO_CLINCH`] round wins, otherwise when the round target is reached (more wins
/// takes it, equal wins is a draw regardless of score).
///
/// Only one Round record is kept per round number: a second call for the same round is
/// ignored and returns `false`. A decisive result must name one of the two players;
/// a missing or foreign winner id is ignored the same way.
pub fn complete_round(m: &mut Match, winner_id: Option<PlayerId>, is_draw: bool) -> bool {
    if m.is_round_complete() {
        log::debug!("match {}: round {} already recorded", m.id, m.running_round);
        return false;
    }

    let winner = if is_draw { None } else { winner_id };
    if !is_draw {
        let Some((w, loser)) = winner.and_then(|w| m.opponent_of(w).map(|l| (w, l))) else {
            log::debug!("match {}: decisive round needs a participant as winner", m.id);
            return false;
        };
        if let Some(p) = m.player_mut(w) {
            p.add_win();
        }
        if let Some(p) = m.player_mut(loser) {
            p.add_loss();
        }
    }

    m.rounds.push(Round {
        round_num: m.running_round,
        outcome: if is_draw { Outcome::Draw } else { Outcome::Decisive },
        winner,
        player_1_score: m.player_1.score,
        player_2_score: m.player_2.score,
    });
    m.completed_round = m.rounds.len() as u32;

    let (p1_wins, p2_wins) = (m.player_1.wins, m.player_2.wins);
    let (outcome, final_winner) = if p1_wins == WINS_TO_CLINCH {
        (Outcome::Decisive, Some(m.player_1.id))
    } else if p2_wins == WINS_TO_CLINCH {
        (Outcome::Decisive, Some(m.player_2.id))
    } else if m.completed_round == m.total_rounds {
        match p1_wins.cmp(&p2_wins) {
            std::cmp::Ordering::Greater => (Outcome::Decisive, Some(m.player_1.id)),
            std::cmp::Ordering::Less => (Outcome::Decisive, Some(m.player_2.id)),
            std::cmp::Ordering::Equal => (Outcome::Draw, None),
        }
    } else {
        (Outcome::Ongoing, None)
    };
    m.outcome = outcome;
    m.final_winner = final_winner;

    match outcome {
        Outcome::Ongoing => log::debug!(
            "match {}: round {} finished ({:?}), {}-{} in round wins",
            m.id,
            m.running_round,
            if is_draw { Outcome::Draw } else { Outcome::Decisive },
            p1_wins,
            p2_wins
        ),
        Outcome::Decisive | Outcome::Draw => {
            m.finished_at = Some(Utc::now());
            log::info!(
                "match {} concluded after {} round(s): {}",
                m.id,
                m.completed_round,
                match m.final_winner_player() {
                    Some(p) => format!("{} wins", p.name),
                    None => "draw".to_string(),
                }
            );
        }
    }
    true
}

/// Move on to the next round: fresh board, player 1 to move. Scores and history are kept.
///
/// Ignored unless the running round is finalized and the match is still ongoing.
pub fn next_round(m: &mut Match) -> bool {
    if !m.is_round_complete() || m.is_over() {
        log::debug!("match {}: cannot advance past round {}", m.id, m.running_round);
        return false;
    }
    m.running_round += 1;
    m.board.clear();
    m.current_turn = m.player_1.id;
    true
}

/// Clear the board only, so an unfinished round can be replayed.
pub fn reset_board(m: &mut Match) {
    m.board.clear();
}

/// Start the match over with the same players: all stats, rounds and the result are zeroed.
pub fn restart_match(m: &mut Match) {
    m.running_round = 1;
    m.completed_round = 0;
    m.board.clear();
    m.rounds.clear();
    m.final_winner = None;
    m.outcome = Outcome::Ongoing;
    m.player_1.reset_stats();
    m.player_2.reset_stats();
    m.current_turn = m.player_1.id;
    m.started_at = Utc::now();
    m.finished_at = None;
}

/// Place the current player's mark, then finalize the round if the board became terminal.
///
/// Produces the same sequence of states as `place_mark`, `detect_terminal` and
/// `complete_round` called one after another. Returns the terminal state reached, if any.
pub fn play_turn(m: &mut Match, row: usize, col: usize) -> Option<Terminal> {
    let player = m.current_turn;
    if !place_mark(m, row, col, player) {
        return None;
    }
    let terminal = detect_terminal(&m.board)?;
    match terminal {
        Terminal::Decisive { line } => {
            let winner = m.player_with_mark(line.mark).map(|p| p.id);
            complete_round(m, winner, false);
        }
        Terminal::Draw => {
            complete_round(m, None, true);
        }
    }
    Some(terminal)
}
