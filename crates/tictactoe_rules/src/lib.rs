//! Pure tic-tac-toe game logic.
//!
//! # Architecture
//!
//! - **Board**: nine [`Square`]s addressed by [`Position`]
//! - **Rules**: [`check_win`] and [`check_draw`] over a board snapshot
//! - **Processor**: [`apply_move`] updates a [`GameState`] in place
//! - **Agent**: [`RandomAgent`] picks an empty cell for the computer side
//!
//! # Example
//!
//! ```
//! use tictactoe_rules::{GameState, GameStatus, Player, apply_move};
//!
//! let mut state = GameState::new();
//! let status = apply_move(&mut state, 4, Player::X).unwrap();
//! assert_eq!(status, GameStatus::InProgress);
//! assert_eq!(state.current_player(), Player::O);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod agent;
mod position;
mod processor;
mod rules;
mod state;
mod types;

pub use agent::{MoveAgent, RandomAgent};
pub use position::Position;
pub use processor::{INVALID_MOVE_MESSAGE, MoveError, apply_move, reject_move};
pub use rules::{LINES, check_draw, check_win, check_winner};
pub use state::{GameState, WELCOME_MESSAGE};
pub use types::{Board, GameStatus, Outcome, Player, Square};
