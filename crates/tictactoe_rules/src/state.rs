//! Per-session game state.

use super::position::Position;
use super::types::{Board, GameStatus, Outcome, Player, Square};
use serde::{Deserialize, Serialize};

/// Greeting shown on a fresh board.
pub const WELCOME_MESSAGE: &str = "Welcome to Tic-Tac-Toe! Player X's turn.";

/// Complete state of one game, as owned by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Current player to move.
    current_player: Player,
    /// Game status.
    status: GameStatus,
    /// Status line for the player.
    message: String,
    /// Cells played, in order.
    history: Vec<Position>,
}

impl GameState {
    /// Creates a fresh game with X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            status: GameStatus::InProgress,
            message: WELCOME_MESSAGE.to_string(),
            history: Vec::new(),
        }
    }

    /// Starts from an arbitrary in-progress board.
    ///
    /// The player to move is derived from the mark counts, so the board
    /// must satisfy X-count minus O-count in {0, 1}.
    pub fn from_board(board: Board) -> Self {
        let current_player = if board.count(Player::X) > board.count(Player::O) {
            Player::O
        } else {
            Player::X
        };
        Self {
            board,
            current_player,
            message: format!("Player {}'s turn.", current_player),
            ..Self::new()
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move. Meaningless once the game is over.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// True once the game has been won or drawn.
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Returns the outcome of a finished game, `None` while in progress.
    pub fn winner(&self) -> Option<Outcome> {
        match self.status {
            GameStatus::InProgress => None,
            GameStatus::Won(player) => Some(Outcome::Winner(player)),
            GameStatus::Draw => Some(Outcome::Draw),
        }
    }

    /// Returns the status message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the move history.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    pub(crate) fn place(&mut self, pos: Position, player: Player) {
        self.board.set(pos, Square::Occupied(player));
        self.history.push(pos);
    }

    pub(crate) fn set_current_player(&mut self, player: Player) {
        self.current_player = player;
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    pub(crate) fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
