//! HTTP surface: one page, one form.

use crate::handler::{TurnRequest, play_turn};
use crate::store::{SessionStore, StoreError};
use crate::view::render_page;
use axum::Router;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use derive_new::new;
use serde::Deserialize;
use std::sync::Arc;
use tictactoe_rules::MoveAgent;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, instrument};

const MAX_SESSION_ID_LEN: usize = 128;

/// Shared state for the request handlers.
#[derive(Clone, new)]
pub struct AppState {
    store: Arc<dyn SessionStore>,
    agent: Arc<dyn MoveAgent>,
    cookie_name: String,
}

/// Fields posted by the board form.
#[derive(Debug, Default, Deserialize)]
pub struct TurnForm {
    /// Cell index as typed by the browser; anything non-numeric is ignored.
    #[serde(rename = "move")]
    position: Option<String>,
    /// Present when "Play Again" was pressed.
    reset_game: Option<String>,
}

impl TurnForm {
    /// Interprets the form. Reset wins over a move; a malformed move is no move.
    pub fn into_request(self) -> TurnRequest {
        if self.reset_game.is_some() {
            return TurnRequest::Reset;
        }
        self.position
            .and_then(|raw| parse_position(raw.trim()))
            .map_or(TurnRequest::Show, TurnRequest::Move)
    }
}

/// Parses a posted cell index. Integers too large for `i64` saturate, so they
/// still count as out-of-range moves.
fn parse_position(raw: &str) -> Option<i64> {
    if let Ok(position) = raw.parse::<i64>() {
        return Some(position);
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show).post(submit))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip_all)]
async fn show(
    State(app): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), StoreError> {
    run_turn(app, jar, TurnRequest::Show).await
}

#[instrument(skip_all)]
async fn submit(
    State(app): State<AppState>,
    jar: CookieJar,
    form: Result<Form<TurnForm>, FormRejection>,
) -> Result<(CookieJar, Html<String>), StoreError> {
    let request = match form {
        Ok(Form(form)) => form.into_request(),
        Err(rejection) => {
            debug!(%rejection, "Unreadable form, rendering current state");
            TurnRequest::Show
        }
    };
    run_turn(app, jar, request).await
}

async fn run_turn(
    app: AppState,
    jar: CookieJar,
    request: TurnRequest,
) -> Result<(CookieJar, Html<String>), StoreError> {
    let (jar, session_id) = session_cookie(jar, &app.cookie_name);
    debug!(session_id = %session_id, ?request, "Handling turn");

    let store = Arc::clone(&app.store);
    let agent = Arc::clone(&app.agent);
    let state = tokio::task::spawn_blocking(move || {
        play_turn(store.as_ref(), &session_id, request, agent.as_ref())
    })
    .await
    .map_err(|e| StoreError::new(format!("Turn task failed: {}", e)))??;

    Ok((jar, Html(render_page(&state))))
}

/// Returns the jar (with a fresh cookie if needed) and the session id.
fn session_cookie(jar: CookieJar, cookie_name: &str) -> (CookieJar, String) {
    let existing = jar
        .get(cookie_name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|id| !id.is_empty() && id.len() <= MAX_SESSION_ID_LEN);

    match existing {
        Some(id) => (jar, id),
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            debug!(session_id = %id, "Issuing new session cookie");
            let cookie = Cookie::build((cookie_name.to_string(), id.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            (jar.add(cookie), id)
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        error!(error = %self, "Session store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "Session storage unavailable").into_response()
    }
}
