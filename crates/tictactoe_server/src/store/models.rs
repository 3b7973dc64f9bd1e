//! Database rows for persisted sessions.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use super::schema;

/// Session row as stored.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::sessions)]
pub struct SessionRow {
    id: String,
    state: String,
    updated_at: NaiveDateTime,
}

/// Insertable session row; `state` is the JSON-encoded game.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::sessions)]
pub struct NewSessionRow {
    id: String,
    state: String,
    updated_at: NaiveDateTime,
}
