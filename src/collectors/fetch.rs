use std::time::Duration;

use thiserror::Error;

use crate::core::position::PositionParseError;
use crate::utils::retry::RetryError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
    #[error("parse error: {0}")]
    Parse(#[from] PositionParseError),
}

impl FetchError {
    /// Timeouts and transport failures are worth another attempt; a malformed
    /// payload will be just as malformed the second time.
    pub fn into_retry(self) -> RetryError<FetchError> {
        match self {
            FetchError::Parse(_) => RetryError::Fatal(self),
            other => RetryError::Retryable(other),
        }
    }
}

pub fn build_client() -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;
    Ok(client)
}

/// GET `url`, aborting if no response arrives within `timeout`.
///
/// On timeout the in-flight request future is dropped, which cancels the
/// underlying connection rather than leaving it to finish unobserved. A
/// non-2xx status is reported as [`FetchError::Status`].
pub async fn fetch_with_timeout(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<reqwest::Response, FetchError> {
    match tokio::time::timeout(timeout, client.get(url).send()).await {
        Ok(Ok(resp)) => {
            if !resp.status().is_success() {
                return Err(FetchError::Status(resp.status()));
            }
            Ok(resp)
        }
        Ok(Err(err)) => Err(FetchError::Transport(err)),
        Err(_elapsed) => Err(FetchError::Timeout(timeout)),
    }
}
