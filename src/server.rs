//! Axum HTTP server: the JSON game API plus result submission and stats.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/game/new` | Random puzzle with a known optimal length |
//! | POST | `/api/game/validate` | Check one move against the current word |
//! | GET | `/api/game/hint` | Next word on the optimal path, partly masked |
//! | POST | `/api/game/score` | Score a complete path |
//! | POST | `/api/game/path` | Optimal path between two words |
//! | POST | `/api/word/validate` | Whether a word is playable |
//! | POST | `/api/word/similarity` | Similarity of two words and whether they link |
//! | POST | `/api/games` | Persist a finished game in the results store |
//! | GET | `/api/stats` | Graph info, total games and recent summary from the store |
//!
//! Every error, including a body that fails to parse, is answered with
//! `{"success": false, "error": ...}`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use crate::engine::{EngineError, GameService, MoveError};
use crate::store::{GameResult, StoreClient};

pub struct AppContext {
    pub game: GameService,
    pub store: StoreClient,
}

pub type AppState = Arc<AppContext>;

type ApiResponse = (StatusCode, Json<Value>);

pub fn create_router(ctx: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/api/game/new", get(handle_new_game))
        .route("/api/game/validate", post(handle_validate_word))
        .route("/api/game/hint", get(handle_hint))
        .route("/api/game/score", post(handle_score))
        .route("/api/game/path", post(handle_path))
        .route("/api/word/validate", post(handle_word_exists))
        .route("/api/word/similarity", post(handle_similarity))
        .route("/api/games", post(handle_submit_game))
        .route("/api/stats", get(handle_stats))
        .layer(cors)
        .with_state(ctx)
}

// ── Request types ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateRequest {
    word: Option<String>,
    current_word: Option<String>,
    #[serde(default)]
    full_path: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HintQuery {
    start_word: Option<String>,
    target_word: Option<String>,
    #[serde(default)]
    current_path: String,
    hint_level: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreRequest {
    #[serde(default)]
    path: Vec<String>,
    start_word: Option<String>,
    target_word: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathRequest {
    start_word: Option<String>,
    target_word: Option<String>,
    max_steps: Option<usize>,
}

#[derive(Deserialize)]
struct WordRequest {
    word: Option<String>,
}

#[derive(Deserialize)]
struct SimilarityRequest {
    word1: Option<String>,
    word2: Option<String>,
}

fn error_response(status: StatusCode, msg: &str) -> ApiResponse {
    (status, Json(json!({ "success": false, "error": msg })))
}

/// Unwraps a JSON body, turning axum's plain-text rejection into the API's
/// error envelope.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiResponse> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        log::debug!("SERVER: Rejected body: {}", rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Game handlers ───────────────────────────────────────────────────

async fn handle_health_check() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

async fn handle_new_game(State(ctx): State<AppState>) -> ApiResponse {
    let puzzle = ctx.game.new_puzzle(&mut rand::rng());
    match puzzle {
        Some(puzzle) => (
            StatusCode::OK,
            Json(json!({ "success": true, "puzzle": puzzle })),
        ),
        None => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not generate valid puzzle",
        ),
    }
}

async fn handle_validate_word(
    State(ctx): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> ApiResponse {
    let req = match parse_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let (Some(word), Some(current)) = (non_empty(req.word), non_empty(req.current_word)) else {
        return error_response(StatusCode::BAD_REQUEST, "word and currentWord are required");
    };

    match ctx.game.check_move(&word, &current, &req.full_path) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "word": word, "connected": true })),
        ),
        Err(e) => {
            let mut body = json!({ "success": false, "error": e.to_string() });
            if let MoveError::NotConnected { similarity, .. } = e {
                body["similarity"] = json!(similarity);
            }
            (StatusCode::BAD_REQUEST, Json(body))
        }
    }
}

async fn handle_hint(State(ctx): State<AppState>, Query(params): Query<HintQuery>) -> ApiResponse {
    let (Some(start), Some(target)) = (non_empty(params.start_word), non_empty(params.target_word))
    else {
        return error_response(StatusCode::BAD_REQUEST, "startWord and targetWord are required");
    };

    let current: Vec<String> = params
        .current_path
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    let level = params.hint_level.unwrap_or(1);

    match ctx.game.hint(&start, &target, &current, level) {
        Ok(hint) => (StatusCode::OK, Json(json!({ "success": true, "hint": hint }))),
        Err(e @ EngineError::NoPath { .. }) => error_response(StatusCode::NOT_FOUND, &e.to_string()),
        Err(e) => {
            log::error!("SERVER: Error getting hint: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

async fn handle_score(
    State(ctx): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> ApiResponse {
    let req = match parse_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let (Some(start), Some(target)) = (non_empty(req.start_word), non_empty(req.target_word)) else {
        return error_response(StatusCode::BAD_REQUEST, "startWord and targetWord are required");
    };

    let report = ctx.game.calculate_score(&req.path, &start, &target);
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "score": report.score,
            "message": report.message,
            "valid": report.valid,
            "algorithmPath": report.algorithm_path,
            "playerSteps": report.player_steps,
            "algorithmSteps": report.algorithm_steps,
        })),
    )
}

async fn handle_path(
    State(ctx): State<AppState>,
    payload: Result<Json<PathRequest>, JsonRejection>,
) -> ApiResponse {
    let req = match parse_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let (Some(start), Some(target)) = (non_empty(req.start_word), non_empty(req.target_word)) else {
        return error_response(StatusCode::BAD_REQUEST, "startWord and targetWord are required");
    };

    if let Some(unknown) = [&start, &target].into_iter().find(|w| !ctx.game.validate_word(w)) {
        let msg = format!("Word '{}' is not in the database", unknown.trim().to_uppercase());
        return error_response(StatusCode::BAD_REQUEST, &msg);
    }

    let max_steps = req.max_steps.unwrap_or_else(|| ctx.game.max_steps());
    match ctx.game.find_optimal_path(&start, &target, max_steps) {
        Some(path) => (
            StatusCode::OK,
            Json(json!({ "success": true, "steps": path.len() - 1, "path": path })),
        ),
        None => {
            let err = EngineError::NoPath {
                from: start,
                to: target,
            };
            error_response(StatusCode::NOT_FOUND, &err.to_string())
        }
    }
}

async fn handle_word_exists(
    State(ctx): State<AppState>,
    payload: Result<Json<WordRequest>, JsonRejection>,
) -> ApiResponse {
    let req = match parse_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let Some(word) = non_empty(req.word) else {
        return error_response(StatusCode::BAD_REQUEST, "word is required");
    };

    let exists = ctx.game.validate_word(&word);
    (
        StatusCode::OK,
        Json(json!({ "success": true, "word": word, "exists": exists })),
    )
}

async fn handle_similarity(
    State(ctx): State<AppState>,
    payload: Result<Json<SimilarityRequest>, JsonRejection>,
) -> ApiResponse {
    let req = match parse_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let (Some(word1), Some(word2)) = (non_empty(req.word1), non_empty(req.word2)) else {
        return error_response(StatusCode::BAD_REQUEST, "word1 and word2 are required");
    };

    match ctx.game.word_similarity(&word1, &word2) {
        Some(similarity) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "word1": word1,
                "word2": word2,
                "similarity": similarity,
                "connected": ctx.game.are_words_connected(&word1, &word2),
            })),
        ),
        None => error_response(
            StatusCode::BAD_REQUEST,
            "Both words must have an embedding",
        ),
    }
}

// ── Store handlers ──────────────────────────────────────────────────

async fn handle_submit_game(
    State(ctx): State<AppState>,
    payload: Result<Json<GameResult>, JsonRejection>,
) -> ApiResponse {
    let result = match parse_body(payload) {
        Ok(result) => result,
        Err(resp) => return resp,
    };
    if result.start_word.trim().is_empty() || result.end_word.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "start_word and end_word are required");
    }
    let saved = ctx.store.submit(&result).await;
    (StatusCode::OK, Json(json!({ "success": saved })))
}

async fn handle_stats(State(ctx): State<AppState>) -> ApiResponse {
    let (total_games, stats) = tokio::join!(ctx.store.get_total_games(), ctx.store.get_game_stats());

    let graph = ctx.game.graph();
    let embedder = graph.embedder();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "graph": {
                "totalWords": ctx.game.words().len(),
                "wordsInGraph": graph.len(),
                "similarityThreshold": graph.threshold(),
                "embeddingModel": embedder.model(),
                "embeddingDimension": embedder.dim(),
            },
            "total_games": total_games,
            "stats": stats,
        })),
    )
}
