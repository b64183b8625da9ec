//! REST client for the hosted `games` table.
//!
//! Every public operation issues exactly one request and degrades to a
//! sentinel (`false` / `None`) on failure. The underlying [`StoreError`] is
//! logged and, when a sink is attached, published as a [`StoreDiagnostic`].

use crate::config::StoreConfig;
use crate::store::error::{StoreDiagnostic, StoreError};
use crate::store::models::{GameResult, PersistedGame, ScoreRow, StatsSummary};
use crate::store::query::{self, COUNT_QUERY, GAMES_TABLE, RECENT_LIMIT, RECENT_QUERY};
use crossbeam_channel::Sender;
use reqwest::header::{AUTHORIZATION, CONTENT_RANGE, HeaderMap, HeaderValue};
use std::time::Duration;

const PREFER: &str = "prefer";
const API_KEY: &str = "apikey";

pub struct StoreClient {
    http: reqwest::Client,
    table_url: Option<String>,
    credential: String,
    diagnostics: Option<Sender<StoreDiagnostic>>,
}

impl StoreClient {
    /// Builds a client from injected configuration.
    ///
    /// A missing endpoint is not an error: every operation then reports
    /// [`StoreError::Disabled`] and returns its sentinel.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let table_url = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(|e| format!("{}/{}", e.trim_end_matches('/'), GAMES_TABLE));

        Ok(Self {
            http,
            table_url,
            credential: config.credential.clone(),
            diagnostics: None,
        })
    }

    /// Attaches a sink that receives one diagnostic per failed operation.
    pub fn with_diagnostics(mut self, sink: Sender<StoreDiagnostic>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.table_url.is_some()
    }

    /// Sends one finished game to the store. `true` only on a 2xx answer.
    pub async fn submit(&self, result: &GameResult) -> bool {
        match self.try_submit(result).await {
            Ok(()) => true,
            Err(e) => {
                self.report("submit", &e);
                false
            }
        }
    }

    /// Total number of stored games, `None` when the store is unavailable.
    pub async fn get_total_games(&self) -> Option<u64> {
        match self.try_total_games().await {
            Ok(total) => Some(total),
            Err(e) => {
                self.report("total_games", &e);
                None
            }
        }
    }

    /// Summary of the 100 most recent games, `None` when the store is
    /// unavailable. An empty table yields an all-zero summary.
    pub async fn get_game_stats(&self) -> Option<StatsSummary> {
        match self.try_game_stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                self.report("game_stats", &e);
                None
            }
        }
    }

    async fn try_submit(&self, result: &GameResult) -> Result<(), StoreError> {
        let url = self.table_url()?;
        let record = PersistedGame::from(result);

        let response = self
            .http
            .post(url)
            .headers(self.auth_headers())
            .header(PREFER, "return=minimal")
            .json(&record)
            .send()
            .await
            .map_err(StoreError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }

        log::debug!(
            "STORE: Saved game {} -> {} (score {})",
            record.start_word,
            record.end_word,
            record.score
        );
        Ok(())
    }

    async fn try_total_games(&self) -> Result<u64, StoreError> {
        let url = format!("{}?{}", self.table_url()?, COUNT_QUERY);

        let response = self
            .http
            .head(url)
            .headers(self.auth_headers())
            .header(PREFER, "count=exact")
            .send()
            .await
            .map_err(StoreError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }

        match response.headers().get(CONTENT_RANGE) {
            Some(value) => {
                let value = value
                    .to_str()
                    .map_err(|_| StoreError::Header(format!("{:?}", value)))?;
                query::parse_content_range(value)
            }
            None => Ok(0),
        }
    }

    async fn try_game_stats(&self) -> Result<StatsSummary, StoreError> {
        let url = format!("{}?{}", self.table_url()?, RECENT_QUERY);

        let response = self
            .http
            .get(url)
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(StoreError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }

        let mut rows: Vec<ScoreRow> = response.json().await.map_err(StoreError::from_reqwest)?;
        rows.truncate(RECENT_LIMIT);
        Ok(query::summarize(&rows))
    }

    fn table_url(&self) -> Result<&str, StoreError> {
        self.table_url.as_deref().ok_or(StoreError::Disabled)
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match (
            HeaderValue::from_str(&self.credential),
            HeaderValue::from_str(&format!("Bearer {}", self.credential)),
        ) {
            (Ok(key), Ok(bearer)) => {
                headers.insert(API_KEY, key);
                headers.insert(AUTHORIZATION, bearer);
            }
            _ => log::warn!("STORE: Credential is not a valid header value, sending without auth"),
        }
        headers
    }

    fn report(&self, operation: &'static str, err: &StoreError) {
        match err {
            StoreError::Disabled => log::debug!("STORE: {} skipped: {}", operation, err),
            _ => log::warn!("STORE: {} failed: {}", operation, err),
        }
        if let Some(sink) = &self.diagnostics {
            let _ = sink.try_send(StoreDiagnostic::new(operation, err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::error::StoreErrorKind;

    fn config(endpoint: Option<&str>) -> StoreConfig {
        StoreConfig {
            endpoint: endpoint.map(str::to_string),
            credential: "anon-key".to_string(),
            timeout_secs: None,
        }
    }

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let client = StoreClient::new(&config(Some("https://example.test/"))).unwrap();
        assert_eq!(
            client.table_url().unwrap(),
            "https://example.test/rest/v1/games"
        );
    }

    #[test]
    fn test_auth_headers() {
        let client = StoreClient::new(&config(Some("https://example.test"))).unwrap();
        let headers = client.auth_headers();
        assert_eq!(headers.get(API_KEY).unwrap(), "anon-key");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer anon-key");
    }

    #[test]
    fn test_auth_headers_skip_invalid_credential() {
        let mut settings = config(Some("https://example.test"));
        settings.credential = "anon\nkey".to_string();
        let client = StoreClient::new(&settings).unwrap();
        let headers = client.auth_headers();
        assert!(headers.get(API_KEY).is_none());
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_disabled_client_returns_sentinels() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let client = StoreClient::new(&config(None)).unwrap().with_diagnostics(tx);
        assert!(!client.is_enabled());

        assert!(!client.submit(&GameResult::default()).await);
        assert_eq!(client.get_total_games().await, None);
        assert_eq!(client.get_game_stats().await, None);

        let kinds: Vec<_> = rx.try_iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![StoreErrorKind::Disabled; 3]);
    }
}
