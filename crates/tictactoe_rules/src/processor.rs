//! Applies single moves to a [`GameState`].
//!
//! Rejected moves are soft failures: the state keeps its board, turn and
//! status, only the message changes. The returned [`MoveError`] tells the
//! caller why, for logging.

use super::position::Position;
use super::rules::{check_draw, check_win};
use super::state::GameState;
use super::types::{GameStatus, Outcome, Player};
use tracing::{debug, instrument};

/// Message shown when a move is rejected.
pub const INVALID_MOVE_MESSAGE: &str = "Invalid move. Choose an empty cell.";

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The position is outside 0-8.
    #[display("Position {} is out of range (must be 0-8)", _0)]
    OutOfRange(i64),

    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

/// Places `player` at `position` and updates turn, status and message.
///
/// # Errors
///
/// Returns [`MoveError`] when the position is out of range, occupied, or the
/// game has ended. The state then differs only in its message.
#[instrument(skip(state))]
pub fn apply_move(
    state: &mut GameState,
    position: usize,
    player: Player,
) -> Result<GameStatus, MoveError> {
    let pos = match validate(state, position) {
        Ok(pos) => pos,
        Err(error) => return Err(reject_move(state, error)),
    };

    state.place(pos, player);

    if check_win(state.board(), player) {
        state.set_status(GameStatus::Won(player));
        state.set_message(Outcome::Winner(player).to_string());
    } else if check_draw(state.board()) {
        state.set_status(GameStatus::Draw);
        state.set_message(Outcome::Draw.to_string());
    } else {
        let next = player.opponent();
        state.set_current_player(next);
        state.set_message(format!("Player {}'s turn.", next));
    }

    debug!(position = %pos, status = ?state.status(), "Move applied");
    Ok(state.status())
}

/// Records a rejected move on the state and hands the error back.
#[instrument(skip(state))]
pub fn reject_move(state: &mut GameState, error: MoveError) -> MoveError {
    debug!(%error, "Move rejected");
    state.set_message(INVALID_MOVE_MESSAGE);
    error
}

fn validate(state: &GameState, position: usize) -> Result<Position, MoveError> {
    let pos = Position::from_index(position)
        .ok_or(MoveError::OutOfRange(position as i64))?;
    if state.is_over() {
        return Err(MoveError::GameOver);
    }
    if !state.board().is_empty(pos) {
        return Err(MoveError::SquareOccupied(pos));
    }
    Ok(pos)
}
