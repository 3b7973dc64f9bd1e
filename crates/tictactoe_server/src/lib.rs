//! Browser tic-tac-toe against a random computer opponent.
//!
//! # Architecture
//!
//! - **Store**: per-session [`GameState`](tictactoe_rules::GameState), in
//!   memory or SQLite
//! - **Handler**: [`play_turn`] runs one request against a session
//! - **View**: [`render_page`] turns a game into an HTML form
//! - **Routes**: axum [`router`] with a session cookie
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_server::{AppState, ServerConfig, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let state = AppState::new(
//!     config.build_store()?,
//!     config.build_agent(),
//!     config.cookie_name().clone(),
//! );
//! let listener = tokio::net::TcpListener::bind(("127.0.0.1", *config.port())).await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod handler;
mod routes;
mod store;
mod view;

pub use config::{ConfigError, ServerConfig, StoreConfig};
pub use handler::{AGENT_PLAYER, TurnRequest, play_turn};
pub use routes::{AppState, TurnForm, router};
pub use store::{MemorySessionStore, SessionId, SessionStore, SqliteSessionStore, StoreError};
pub use view::render_page;
