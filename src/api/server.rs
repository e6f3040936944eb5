use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use crate::api::types::{PassDto, PositionDto};
use crate::collectors::position_client::PositionClient;
use crate::core::countdown::Countdown;
use crate::core::geocode::search_cities;
use crate::core::position::Position;
use crate::predictors::passes::{visibility, PassProvider};
use crate::utils::db;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<PositionClient>,
    pub passes: Arc<PassProvider>,
    /// Most recent completed poll wins; no sequence guard.
    pub latest: Arc<RwLock<Option<Position>>>,
    pub db_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PassesQuery {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeQuery {
    q: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/position", get(get_position))
        .route("/passes", get(get_passes))
        .route("/geocode", get(geocode))
        .nest_service("/ui", ServeDir::new("web"))
        .route_service("/", ServeFile::new("web/index.html"))
        .route_service("/live", ServeFile::new("web/live.html"))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

pub async fn run_server(state: AppState, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("API server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let sink_ok = db::open_or_init(&state.db_path).is_ok();
    let has_position = state.latest.read().unwrap().is_some();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok", "sink": sink_ok, "position": has_position })),
    )
}

/// Latest polled position; falls back to a one-shot fetch before the first
/// poll lands. `503` with an empty-state body when no data is available.
async fn get_position(State(state): State<AppState>) -> impl IntoResponse {
    let cached = state.latest.read().unwrap().clone();
    let position = match cached {
        Some(p) => Some(p),
        None => state.client.current_position().await,
    };

    match position {
        Some(p) => (StatusCode::OK, Json(serde_json::json!(PositionDto::from(&p)))),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "position unavailable" })),
        ),
    }
}

async fn get_passes(State(state): State<AppState>, Query(q): Query<PassesQuery>) -> impl IntoResponse {
    let label = format!("Location {}, {}", q.lat, q.lon);

    if !(-90.0..=90.0).contains(&q.lat) || !(-180.0..=180.0).contains(&q.lon) {
        log_search(&state, &label, q.lat, q.lon, 0, "error");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": "lat/lon out of range" })),
        );
    }

    let now = chrono::Utc::now();
    let passes = state.passes.upcoming_passes(q.lat, q.lon, now);
    let out: Vec<PassDto> = passes
        .iter()
        .map(|p| PassDto {
            name: p.name,
            norad_id: p.norad_id,
            start_time: p.start_time,
            duration_min: p.duration_min,
            max_elevation_deg: p.max_elevation_deg,
            direction: p.direction,
            visibility: visibility(p.max_elevation_deg),
            starts_in: Countdown::until(now, p.start_time),
        })
        .collect();

    log_search(&state, &label, q.lat, q.lon, out.len(), "success");
    (StatusCode::OK, Json(serde_json::json!(out)))
}

async fn geocode(Query(q): Query<GeocodeQuery>) -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!(search_cities(&q.q))))
}

// Best-effort, no retries: a sink failure must never alter the HTTP outcome.
fn log_search(state: &AppState, city: &str, lat: f64, lon: f64, passes_found: usize, status: &str) {
    let result = db::open_or_init(&state.db_path)
        .and_then(|conn| db::insert_search(&conn, city, lat, lon, passes_found, status));
    if let Err(err) = result {
        warn!(error = %err, "Failed to log search to sink");
    }
}

#[cfg(test)]
mod tests {
    use super::{get_passes, get_position, AppState, PassesQuery};
    use crate::collectors::position_client::PositionClient;
    use crate::predictors::passes::PassProvider;
    use crate::utils::retry::RetryPolicy;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::path::PathBuf;
    use std::sync::{Arc, RwLock};
    use std::time::Duration;

    fn state_with_sink(db_path: PathBuf) -> AppState {
        // Endpoint that refuses connections immediately; only /position tests care.
        let client = PositionClient::with_settings(
            "http://127.0.0.1:1/iss-now.json".to_string(),
            Duration::from_millis(200),
            RetryPolicy {
                max_attempts: 1,
                base_delay: Duration::from_millis(1),
            },
            None,
        )
        .unwrap();
        AppState {
            client: Arc::new(client),
            passes: Arc::new(PassProvider::new("demo_key")),
            latest: Arc::new(RwLock::new(None)),
            db_path,
        }
    }

    fn search_rows(path: &std::path::Path) -> Vec<(String, i64, String)> {
        let conn = rusqlite::Connection::open(path).unwrap();
        let mut stmt = conn
            .prepare("SELECT city, passes_found, status FROM search_log ORDER BY id")
            .unwrap();
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap();
        rows.filter_map(Result::ok).collect()
    }

    #[tokio::test]
    async fn passes_returns_sorted_passes_and_logs_the_search() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("sink.sqlite");
        let state = state_with_sink(sink.clone());

        let resp = get_passes(
            State(state),
            Query(PassesQuery {
                lat: 40.7128,
                lon: -74.0060,
            }),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let rows = search_rows(&sink);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "Location 40.7128, -74.006");
        assert_eq!(rows[0].1, 6);
        assert_eq!(rows[0].2, "success");
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected_and_logged_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("sink.sqlite");
        let state = state_with_sink(sink.clone());

        let resp = get_passes(State(state), Query(PassesQuery { lat: 91.0, lon: 0.0 }))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let rows = search_rows(&sink);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1, 0);
        assert_eq!(rows[0].2, "error");
    }

    #[tokio::test]
    async fn sink_failure_does_not_change_the_passes_outcome() {
        let dir = tempfile::tempdir().unwrap();
        // The sink path is a directory: every open fails.
        let state = state_with_sink(dir.path().to_path_buf());

        let resp = get_passes(
            State(state),
            Query(PassesQuery {
                lat: 40.7128,
                lon: -74.0060,
            }),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn position_is_an_empty_state_when_no_data_exists() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_sink(dir.path().join("sink.sqlite"));

        let resp = get_position(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn position_serves_the_cached_poll_result() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_sink(dir.path().join("sink.sqlite"));
        *state.latest.write().unwrap() = Some(crate::core::position::Position {
            latitude: 10.5,
            longitude: -20.25,
            altitude: 408.0,
            timestamp: 1_700_000_000,
            azimuth: None,
            elevation: None,
            ra: None,
            dec: None,
        });

        let resp = get_position(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
