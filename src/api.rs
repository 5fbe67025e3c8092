use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::error::EngineError;
use crate::game::{Game, PositionSnapshot};
use crate::rules::{PlayedMove, Rules};

pub const HELLO: &str = "Hello, world!";

/// The one shared game. Every handler that touches the board holds the lock for
/// its whole cycle, so a search never interleaves with another request's moves.
#[derive(Clone)]
pub struct AppState {
    game: Arc<Mutex<Game>>,
}

pub fn router(game: Game) -> Router {
    shared_router(Arc::new(Mutex::new(game)))
}

/// Router over a game the caller keeps a handle to.
pub fn shared_router(game: Arc<Mutex<Game>>) -> Router {
    let state = AppState { game };

    Router::new()
        .route("/", get(play_move))
        .route("/test", get(hello))
        .route("/health", get(hello))
        .route("/position", get(position))
        .route("/reset", post(reset))
        .with_state(state)
}

pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            EngineError::TerminalPosition { outcome } => {
                log::warn!("move requested in finished game ({outcome:?})");
                (StatusCode::CONFLICT, Json(json!({ "error": "game_over", "outcome": outcome }))).into_response()
            }
            other => {
                log::error!("{other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "contract_violation", "detail": other.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

/// Whether a handler may take over a lock left poisoned by a panicking cycle.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Poisoned {
    Refuse,
    /// The handler rebuilds the game; the poison is cleared once it succeeds.
    Recover,
}

/// Runs `f` on the blocking pool with the game locked.
async fn with_game<T, F>(state: AppState, poisoned: Poisoned, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut Game) -> Result<T, EngineError> + Send + 'static,
{
    let joined = tokio::task::spawn_blocking(move || {
        let (mut game, was_poisoned) = match state.game.lock() {
            Ok(game) => (game, false),
            Err(e) if poisoned == Poisoned::Recover => (e.into_inner(), true),
            Err(_) => {
                return Err(EngineError::contract(
                    "game lock poisoned by an earlier failed search; POST /reset to recover",
                ))
            }
        };
        let out = f(&mut *game)?;
        if was_poisoned {
            state.game.clear_poison();
            log::warn!("game lock recovered after an earlier failed search");
        }
        Ok(out)
    })
    .await;
    match joined {
        Ok(res) => res.map_err(ApiError::from),
        Err(e) => Err(EngineError::contract(format!("search task failed: {e}")).into()),
    }
}

async fn play_move(State(state): State<AppState>) -> Result<Json<PlayedMove>, ApiError> {
    with_game(state, Poisoned::Refuse, |game| game.play_best_move().map(|report| report.played)).await.map(Json)
}

async fn hello() -> &'static str {
    HELLO
}

async fn position(State(state): State<AppState>) -> Result<Json<PositionSnapshot>, ApiError> {
    with_game(state, Poisoned::Refuse, |game| Ok(game.snapshot())).await.map(Json)
}

async fn reset(State(state): State<AppState>) -> Result<Json<PositionSnapshot>, ApiError> {
    with_game(state, Poisoned::Recover, |game| {
        game.reset()?;
        log::info!("game reset to {}", game.board().fen());
        Ok(game.snapshot())
    })
    .await
    .map(Json)
}
