//! Integration tests for the results store client.
//!
//! Each test starts an in-process axum router on 127.0.0.1 that mimics the
//! hosted REST table and points a real `StoreClient` at it.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::routing::post;
use serde_json::Value;

use sixdegrees::config::StoreConfig;
use sixdegrees::store::{GameResult, StatsSummary, StoreClient, StoreDiagnostic, StoreErrorKind};

// ── Mock store ───────────────────────────────────────────────────────

struct MockInner {
    create_status: StatusCode,
    count_status: StatusCode,
    content_range: Option<&'static str>,
    rows_status: StatusCode,
    rows: &'static str,
    posted: Vec<(HeaderMap, Value)>,
    count_requests: Vec<(HeaderMap, Option<String>)>,
    row_queries: Vec<Option<String>>,
}

#[derive(Clone)]
struct MockStore(Arc<Mutex<MockInner>>);

impl MockStore {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(MockInner {
            create_status: StatusCode::CREATED,
            count_status: StatusCode::OK,
            content_range: None,
            rows_status: StatusCode::OK,
            rows: "[]",
            posted: Vec::new(),
            count_requests: Vec::new(),
            row_queries: Vec::new(),
        })))
    }

    fn with<F: FnOnce(&mut MockInner)>(self, f: F) -> Self {
        f(&mut self.0.lock().unwrap());
        self
    }

    fn inner(&self) -> std::sync::MutexGuard<'_, MockInner> {
        self.0.lock().unwrap()
    }
}

async fn create(
    State(mock): State<MockStore>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let json: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let mut inner = mock.inner();
    inner.posted.push((headers, json));
    inner.create_status
}

async fn count(
    State(mock): State<MockStore>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> (StatusCode, HeaderMap) {
    let mut inner = mock.inner();
    inner.count_requests.push((headers, query));
    let mut out = HeaderMap::new();
    if let Some(range) = inner.content_range {
        out.insert("content-range", HeaderValue::from_static(range));
    }
    (inner.count_status, out)
}

async fn list(State(mock): State<MockStore>, RawQuery(query): RawQuery) -> (StatusCode, String) {
    let mut inner = mock.inner();
    inner.row_queries.push(query);
    (inner.rows_status, inner.rows.to_string())
}

async fn spawn(mock: MockStore) -> String {
    let app = Router::new()
        .route("/rest/v1/games", post(create).head(count).get(list))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// An address nothing listens on.
async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn client(endpoint: String) -> (StoreClient, crossbeam_channel::Receiver<StoreDiagnostic>) {
    let config = StoreConfig {
        endpoint: Some(endpoint),
        credential: "anon-key".to_string(),
        timeout_secs: Some(5),
    };
    let (tx, rx) = crossbeam_channel::unbounded();
    (StoreClient::new(&config).unwrap().with_diagnostics(tx), rx)
}

fn sample_result() -> GameResult {
    GameResult {
        start_word: "cat".into(),
        end_word: "dog".into(),
        player_path: Some(vec!["cat".into(), "pet".into(), "dog".into()]),
        optimal_path: Some(vec!["cat".into(), "pet".into(), "dog".into()]),
        player_length: 2,
        optimal_length: 2,
        score: 100,
        valid: None,
        hints_used: None,
    }
}

fn kinds(rx: &crossbeam_channel::Receiver<StoreDiagnostic>) -> Vec<StoreErrorKind> {
    rx.try_iter().map(|d| d.kind).collect()
}

// ── submit ───────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_posts_flattened_record() {
    let mock = MockStore::new();
    let (store, rx) = client(spawn(mock.clone()).await);

    assert!(store.submit(&sample_result()).await);
    assert!(kinds(&rx).is_empty());

    let inner = mock.inner();
    assert_eq!(inner.posted.len(), 1);
    let (headers, body) = &inner.posted[0];

    assert_eq!(headers["apikey"], "anon-key");
    assert_eq!(headers["authorization"], "Bearer anon-key");
    assert_eq!(headers["prefer"], "return=minimal");
    assert_eq!(headers["content-type"], "application/json");

    assert_eq!(body["start_word"], "cat");
    assert_eq!(body["player_path"], "cat,pet,dog");
    assert_eq!(body["optimal_path"], "cat,pet,dog");
    assert_eq!(body["score"], 100);
    assert_eq!(body["valid"], false);
    assert_eq!(body["hints_used"], 0);
    assert!(body.get("completed_at").is_none());
}

#[tokio::test]
async fn submit_absent_paths_flatten_to_empty() {
    let mock = MockStore::new();
    let (store, _rx) = client(spawn(mock.clone()).await);

    let result = GameResult {
        player_path: None,
        optimal_path: Some(Vec::new()),
        ..sample_result()
    };
    assert!(store.submit(&result).await);

    let inner = mock.inner();
    let (_, body) = &inner.posted[0];
    assert_eq!(body["player_path"], "");
    assert_eq!(body["optimal_path"], "");
}

#[tokio::test]
async fn submit_returns_false_on_error_status() {
    let mock = MockStore::new().with(|m| m.create_status = StatusCode::UNAUTHORIZED);
    let (store, rx) = client(spawn(mock).await);

    assert!(!store.submit(&sample_result()).await);
    assert_eq!(kinds(&rx), vec![StoreErrorKind::Status]);
}

#[tokio::test]
async fn submit_returns_false_when_unreachable() {
    let (store, rx) = client(dead_endpoint().await);

    assert!(!store.submit(&sample_result()).await);
    assert_eq!(kinds(&rx), vec![StoreErrorKind::Transport]);
}

// ── get_total_games ──────────────────────────────────────────────────

#[tokio::test]
async fn total_games_reads_content_range() {
    let mock = MockStore::new().with(|m| m.content_range = Some("0-9/42"));
    let (store, _rx) = client(spawn(mock.clone()).await);

    assert_eq!(store.get_total_games().await, Some(42));

    let inner = mock.inner();
    let (headers, query) = &inner.count_requests[0];
    assert_eq!(headers["prefer"], "count=exact");
    assert_eq!(headers["apikey"], "anon-key");
    assert_eq!(query.as_deref(), Some("select=count"));
}

#[tokio::test]
async fn total_games_star_range() {
    let mock = MockStore::new().with(|m| m.content_range = Some("*/0"));
    let (store, _rx) = client(spawn(mock).await);

    assert_eq!(store.get_total_games().await, Some(0));
}

#[tokio::test]
async fn total_games_missing_header_is_zero() {
    let (store, rx) = client(spawn(MockStore::new()).await);

    assert_eq!(store.get_total_games().await, Some(0));
    assert!(kinds(&rx).is_empty());
}

#[tokio::test]
async fn total_games_garbage_header_is_none() {
    let mock = MockStore::new().with(|m| m.content_range = Some("0-9/many"));
    let (store, rx) = client(spawn(mock).await);

    assert_eq!(store.get_total_games().await, None);
    assert_eq!(kinds(&rx), vec![StoreErrorKind::Header]);
}

#[tokio::test]
async fn total_games_error_status_is_none() {
    let mock = MockStore::new().with(|m| {
        m.count_status = StatusCode::SERVICE_UNAVAILABLE;
        m.content_range = Some("0-9/42");
    });
    let (store, rx) = client(spawn(mock).await);

    assert_eq!(store.get_total_games().await, None);
    assert_eq!(kinds(&rx), vec![StoreErrorKind::Status]);
}

// ── get_game_stats ───────────────────────────────────────────────────

#[tokio::test]
async fn stats_empty_table_is_zero_not_none() {
    let mock = MockStore::new();
    let (store, _rx) = client(spawn(mock.clone()).await);

    assert_eq!(store.get_game_stats().await, Some(StatsSummary::default()));
    assert_eq!(
        mock.inner().row_queries[0].as_deref(),
        Some("select=score,player_length,optimal_length&order=completed_at.desc&limit=100")
    );
}

#[tokio::test]
async fn stats_aggregate_recent_rows() {
    let mock = MockStore::new().with(|m| {
        m.rows = r#"[
            {"score": 100, "player_length": 2, "optimal_length": 2},
            {"score": 100, "player_length": 3, "optimal_length": 3},
            {"score": 50, "player_length": 5, "optimal_length": 2},
            {"score": 0, "player_length": null, "optimal_length": 2}
        ]"#
    });
    let (store, _rx) = client(spawn(mock).await);

    assert_eq!(
        store.get_game_stats().await,
        Some(StatsSummary {
            total: 4,
            perfect: 2,
            avg_score: 63
        })
    );
}

#[tokio::test]
async fn stats_error_status_is_none() {
    let mock = MockStore::new().with(|m| m.rows_status = StatusCode::INTERNAL_SERVER_ERROR);
    let (store, rx) = client(spawn(mock).await);

    assert_eq!(store.get_game_stats().await, None);
    assert_eq!(kinds(&rx), vec![StoreErrorKind::Status]);
}

#[tokio::test]
async fn stats_malformed_body_is_none() {
    let mock = MockStore::new().with(|m| m.rows = r#"{"message": "not a list"}"#);
    let (store, rx) = client(spawn(mock).await);

    assert_eq!(store.get_game_stats().await, None);
    assert_eq!(kinds(&rx), vec![StoreErrorKind::Decode]);
}

#[tokio::test]
async fn reads_return_none_when_unreachable() {
    let (store, rx) = client(dead_endpoint().await);

    assert_eq!(store.get_total_games().await, None);
    assert_eq!(store.get_game_stats().await, None);
    assert_eq!(
        kinds(&rx),
        vec![StoreErrorKind::Transport, StoreErrorKind::Transport]
    );
}
