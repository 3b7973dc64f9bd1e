//! Server-side session state.
//!
//! Each browser session owns exactly one [`GameState`]. Handlers load it at
//! the start of a request and save it at the end; concurrent requests for the
//! same session are last-write-wins.

mod error;
mod memory;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;

pub use error::StoreError;
pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

use tictactoe_rules::GameState;

/// Opaque per-browser session identifier.
pub type SessionId = String;

/// Key-value store of game state by session.
///
/// Implementations must be read-your-writes consistent for one session's
/// sequential requests. Entries idle past the store's TTL read as absent.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Loads the state saved for `id`, if any.
    fn load(&self, id: &str) -> Result<Option<GameState>, StoreError>;

    /// Saves `state` for `id`, replacing whatever was there.
    fn save(&self, id: &str, state: &GameState) -> Result<(), StoreError>;

    /// Drops the state saved for `id`.
    fn reset(&self, id: &str) -> Result<(), StoreError>;

    /// Removes expired entries, returning how many were dropped.
    fn purge_expired(&self) -> Result<usize, StoreError>;
}
