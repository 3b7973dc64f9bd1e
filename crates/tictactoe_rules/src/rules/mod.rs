//! Game rules for tic-tac-toe.
//!
//! Pure functions evaluating a board snapshot. Rules are kept apart from
//! state so the move processor and tests can use them directly.

mod draw;
mod win;

pub use draw::check_draw;
pub use win::{LINES, check_win, check_winner};
