//! One turn of play: load, reset, human move, computer reply, save.

use crate::store::{SessionStore, StoreError};
use tictactoe_rules::{GameState, MoveAgent, MoveError, Player, apply_move, reject_move};
use tracing::{debug, info, instrument, warn};

/// The computer always plays O.
pub const AGENT_PLAYER: Player = Player::O;

/// What the browser asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRequest {
    /// Render the current state.
    Show,
    /// Discard the game and start over.
    Reset,
    /// Play the given cell as the player to move.
    Move(i64),
}

/// Runs one request against the session's game and returns the new state.
///
/// A missing session starts fresh. A move is only attempted while the game
/// is in progress; a move posted after the end is answered with the
/// invalid-move message and changes nothing else. When the human move
/// leaves O to play, the agent replies within the same call.
///
/// # Errors
///
/// Returns [`StoreError`] if the session cannot be loaded or saved. Rejected
/// moves are not errors.
#[instrument(skip(store, agent), fields(agent = agent.name()))]
pub fn play_turn(
    store: &dyn SessionStore,
    session_id: &str,
    request: TurnRequest,
    agent: &dyn MoveAgent,
) -> Result<GameState, StoreError> {
    let mut state = if request == TurnRequest::Reset {
        info!(session_id, "Resetting game");
        store.reset(session_id)?;
        GameState::new()
    } else {
        match store.load(session_id)? {
            Some(state) => state,
            None => {
                info!(session_id, "Starting new game");
                GameState::new()
            }
        }
    };

    if let TurnRequest::Move(position) = request {
        if state.is_over() {
            let error = reject_move(&mut state, MoveError::GameOver);
            debug!(session_id, position, %error, "Move after game end ignored");
        } else {
            human_move(&mut state, position);
            agent_reply(&mut state, agent);
        }
    }

    store.save(session_id, &state)?;
    debug!(session_id, status = ?state.status(), "Turn complete");
    Ok(state)
}

fn human_move(state: &mut GameState, position: i64) {
    let player = state.current_player();
    let result = match usize::try_from(position) {
        Ok(index) => apply_move(state, index, player),
        Err(_) => Err(reject_move(state, MoveError::OutOfRange(position))),
    };
    match result {
        Ok(status) => info!(position, %player, ?status, "Human move applied"),
        Err(error) => warn!(position, %player, %error, "Human move rejected"),
    }
}

fn agent_reply(state: &mut GameState, agent: &dyn MoveAgent) {
    if state.is_over() || state.current_player() != AGENT_PLAYER {
        return;
    }
    let Some(pos) = agent.choose_move(state.board()) else {
        warn!("Agent found no empty cell");
        return;
    };
    match apply_move(state, pos.to_index(), AGENT_PLAYER) {
        Ok(status) => info!(position = %pos, ?status, "Agent move applied"),
        Err(error) => warn!(position = %pos, %error, "Agent move rejected"),
    }
}
