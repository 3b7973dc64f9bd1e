//! Draw detection logic for tic-tac-toe.

use crate::{Board, Square};
use tracing::instrument;

/// Checks if the board is full (no empty square left).
///
/// Win status is not considered; callers check for a win first.
#[instrument(skip(board))]
pub fn check_draw(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}
