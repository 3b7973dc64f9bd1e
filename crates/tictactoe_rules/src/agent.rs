//! Computer opponents.

use super::position::Position;
use super::types::Board;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Picks a cell for the computer side.
pub trait MoveAgent: Send + Sync {
    /// Chooses an empty cell, or `None` when the board is full.
    fn choose_move(&self, board: &Board) -> Option<Position>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// Agent choosing uniformly among the empty cells.
///
/// The RNG sits behind a mutex so a single agent can serve every request.
#[derive(Debug)]
pub struct RandomAgent<R> {
    rng: Mutex<R>,
}

impl<R: Rng + Send> RandomAgent<R> {
    /// Creates an agent drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl RandomAgent<StdRng> {
    /// Creates an agent seeded from OS entropy.
    #[instrument]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> MoveAgent for RandomAgent<R> {
    #[instrument(skip(self, board))]
    fn choose_move(&self, board: &Board) -> Option<Position> {
        let available = Position::valid_moves(board);
        if available.is_empty() {
            debug!("No empty cells left");
            return None;
        }

        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Agent RNG lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        let choice = available.choose(&mut *rng).copied();
        debug!(choice = ?choice, candidates = available.len(), "Random agent chose");
        choice
    }

    fn name(&self) -> &str {
        "random"
    }
}
