mod api;
mod collectors;
mod core;
mod predictors;
mod utils;

use std::sync::{Arc, RwLock};

use tracing::{error, info, warn};

use collectors::poller::Poller;
use collectors::position_client::PositionClient;
use predictors::passes::PassProvider;

#[tokio::main]
async fn main() {
    utils::logging::init();
    let cfg = utils::config::Config::from_env();
    info!(addr = %cfg.bind_addr, "skywatch starting");

    match utils::db::open_or_init(&cfg.db_path) {
        Ok(_) => info!(path = %cfg.db_path.display(), "Telemetry sink ready"),
        // The sink is telemetry, never load-bearing.
        Err(e) => warn!(error = %e, "Telemetry sink unavailable, continuing without it"),
    }

    let client = match PositionClient::new(&cfg) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return;
        }
    };

    let latest = Arc::new(RwLock::new(None));
    let poller = {
        let client = client.clone();
        let latest = latest.clone();
        Poller::spawn(cfg.poll_interval, move || {
            let client = client.clone();
            let latest = latest.clone();
            async move {
                if let Some(position) = client.current_position().await {
                    // Most recent completed poll wins.
                    *latest.write().unwrap() = Some(position);
                }
            }
        })
    };

    let state = api::server::AppState {
        client,
        passes: Arc::new(PassProvider::new(&cfg.n2yo_api_key)),
        latest,
        db_path: cfg.db_path.clone(),
    };
    api::server::run_server(state, cfg.bind_addr).await;

    poller.shutdown();
    info!("skywatch stopped");
}
