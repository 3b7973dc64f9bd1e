//! SQLite-backed session store.

use chrono::{NaiveDateTime, TimeDelta, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::time::Duration;
use tictactoe_rules::GameState;
use tracing::{debug, info, instrument};

use super::models::{NewSessionRow, SessionRow};
use super::{SessionStore, StoreError, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Session store keeping each game as a JSON row in SQLite.
///
/// A connection is opened per call, so the store is cheap to share across
/// blocking tasks. The database runs in WAL mode and every connection waits
/// out lock contention, so concurrent sessions do not fail each other.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    db_path: String,
    ttl: TimeDelta,
}

impl SqliteSessionStore {
    /// Opens the database at `db_path`, creating it and running migrations
    /// as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated,
    /// or if `ttl` is too large to represent.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String, ttl: Duration) -> Result<Self, StoreError> {
        info!(path = %db_path, ttl_secs = ttl.as_secs(), "Opening SQLite session store");
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|e| StoreError::new(format!("Session TTL out of range: {}", e)))?;
        let store = Self { db_path, ttl };

        let mut conn = store.connection()?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migrations failed: {}", e)))?;
        info!(applied = applied.len(), "Session schema ready");

        Ok(store)
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn cutoff(&self) -> NaiveDateTime {
        Self::now() - self.ttl
    }
}

impl SessionStore for SqliteSessionStore {
    #[instrument(skip(self))]
    fn load(&self, id: &str) -> Result<Option<GameState>, StoreError> {
        use schema::sessions::dsl;

        let mut conn = self.connection()?;
        let row = dsl::sessions
            .filter(dsl::id.eq(id))
            .filter(dsl::updated_at.gt(self.cutoff()))
            .select(SessionRow::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => {
                debug!(session_id = id, updated_at = %row.updated_at(), "Session found");
                Ok(Some(serde_json::from_str(row.state())?))
            }
            None => {
                debug!(session_id = id, "Session not found or expired");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, state))]
    fn save(&self, id: &str, state: &GameState) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let row = NewSessionRow::new(id.to_string(), serde_json::to_string(state)?, Self::now());

        diesel::replace_into(schema::sessions::table)
            .values(&row)
            .execute(&mut conn)?;

        debug!(session_id = id, "Session saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn reset(&self, id: &str) -> Result<(), StoreError> {
        use schema::sessions::dsl;

        let mut conn = self.connection()?;
        let deleted = diesel::delete(dsl::sessions.filter(dsl::id.eq(id))).execute(&mut conn)?;
        debug!(session_id = id, deleted, "Session reset");
        Ok(())
    }

    #[instrument(skip(self))]
    fn purge_expired(&self) -> Result<usize, StoreError> {
        use schema::sessions::dsl;

        let mut conn = self.connection()?;
        let purged = diesel::delete(dsl::sessions.filter(dsl::updated_at.le(self.cutoff())))
            .execute(&mut conn)?;
        if purged > 0 {
            info!(purged, "Purged expired sessions");
        }
        Ok(purged)
    }
}
