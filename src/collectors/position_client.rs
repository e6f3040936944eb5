use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::collectors::fetch::{build_client, fetch_with_timeout, FetchError};
use crate::core::position::{parse_position_body, Position};
use crate::utils::config::Config;
use crate::utils::db;
use crate::utils::retry::{with_retry, RetryError, RetryPolicy};

/// Client for the public current-position endpoint.
///
/// Constructed explicitly and threaded through call sites; tests point it at
/// a local fake endpoint. Every failure mode degrades to `None` so callers
/// always receive a definite outcome.
pub struct PositionClient {
    http: reqwest::Client,
    endpoint: String,
    fetch_timeout: Duration,
    retry: RetryPolicy,
    /// Telemetry sink path; `None` disables position logging entirely.
    sink_path: Option<PathBuf>,
}

impl PositionClient {
    pub fn new(cfg: &Config) -> Result<Self, FetchError> {
        Self::with_settings(
            cfg.position_url.clone(),
            cfg.fetch_timeout,
            cfg.retry,
            Some(cfg.db_path.clone()),
        )
    }

    pub fn with_settings(
        endpoint: String,
        fetch_timeout: Duration,
        retry: RetryPolicy,
        sink_path: Option<PathBuf>,
    ) -> Result<Self, FetchError> {
        Ok(PositionClient {
            http: build_client()?,
            endpoint,
            fetch_timeout,
            retry,
            sink_path,
        })
    }

    /// Fetches the current position, retrying transient failures with
    /// exponential backoff.
    ///
    /// Best-effort by contract: exhausted retries, a malformed payload, or a
    /// body with no position object all come back as `None` rather than an
    /// error. A fetched position is appended to the telemetry sink as a side
    /// effect; sink failures never affect the returned value.
    pub async fn current_position(&self) -> Option<Position> {
        let outcome = with_retry(
            || async {
                let resp = fetch_with_timeout(&self.http, &self.endpoint, self.fetch_timeout)
                    .await
                    .map_err(FetchError::into_retry)?;
                let body = resp
                    .text()
                    .await
                    .map_err(|e| RetryError::Retryable(FetchError::Transport(e)))?;
                parse_position_body(&body)
                    .map_err(|e| RetryError::Fatal(FetchError::Parse(e)))
            },
            &self.retry,
        )
        .await;

        match outcome {
            Ok(Some(position)) => {
                self.log_position(&position);
                Some(position)
            }
            Ok(None) => {
                debug!("Feed returned no position object");
                None
            }
            Err(err) => {
                warn!(error = %err, endpoint = %self.endpoint, "Failed to fetch current position");
                None
            }
        }
    }

    // Fire-and-forget telemetry; must never block or fail the read path.
    fn log_position(&self, position: &Position) {
        let Some(path) = &self.sink_path else {
            return;
        };
        let result =
            db::open_or_init(path).and_then(|conn| db::insert_position(&conn, position));
        if let Err(err) = result {
            warn!(error = %err, "Failed to log position to sink");
        }
    }
}
