use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::utils::retry::RetryPolicy;

pub const DEMO_API_KEY: &str = "demo_key";

/// Runtime configuration, read once at startup from `SKYWATCH_*` environment
/// variables. Every field has a demo-friendly fallback so the service runs
/// with no environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Upstream current-position endpoint (open-notify compatible).
    pub position_url: String,
    pub poll_interval: Duration,
    pub fetch_timeout: Duration,
    pub retry: RetryPolicy,
    /// Path of the SQLite telemetry sink.
    pub db_path: PathBuf,
    /// Key for the real pass feed; `demo_key` selects the bundled demo schedule.
    pub n2yo_api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            position_url: "http://api.open-notify.org/iss-now.json".to_string(),
            poll_interval: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            db_path: PathBuf::from("data/db/skywatch.sqlite"),
            n2yo_api_key: DEMO_API_KEY.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let bind_addr = std::env::var("SKYWATCH_BIND_ADDR")
            .ok()
            .and_then(|v| match v.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    warn!(value = %v, "Invalid SKYWATCH_BIND_ADDR, using default");
                    None
                }
            })
            .unwrap_or(defaults.bind_addr);

        let position_url =
            std::env::var("SKYWATCH_POSITION_URL").unwrap_or(defaults.position_url);

        let poll_interval = env_u64("SKYWATCH_POLL_INTERVAL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);

        let fetch_timeout = env_u64("SKYWATCH_FETCH_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        let retry = RetryPolicy {
            max_attempts: env_u64("SKYWATCH_RETRY_MAX_ATTEMPTS")
                .map(|n| n as u32)
                .unwrap_or(defaults.retry.max_attempts),
            base_delay: env_u64("SKYWATCH_RETRY_BASE_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry.base_delay),
        };

        let db_path = std::env::var("SKYWATCH_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let n2yo_api_key =
            std::env::var("SKYWATCH_N2YO_API_KEY").unwrap_or(defaults.n2yo_api_key);

        Config {
            bind_addr,
            position_url,
            poll_interval,
            fetch_timeout,
            retry,
            db_path,
            n2yo_api_key,
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(var = name, value = %raw, "Invalid numeric value, using default");
            None
        }
    }
}
