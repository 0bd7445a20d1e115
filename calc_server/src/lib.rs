//! HTTP transport for the damage calculator engine. The library half exists
//! so integration tests can build the `Router` without going through
//! `main`'s process setup.

mod build;
mod cache_setup;
pub mod config;
mod error;
mod routes;
mod state;

pub use state::AppState;

use axum::routing::{get, post, put};
use axum::Router;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/refresh", post(routes::refresh))
        .route("/rotations", put(routes::put_rotation))
        .route("/damage", post(routes::damage))
        .with_state(state)
}

pub async fn init_state(base_dir: std::path::PathBuf) -> AppState {
    let state = AppState::new(base_dir);
    if let Err(err) = cache_setup::refresh(&state).await {
        tracing::warn!(%err, "initial cache scan failed");
    }
    state
}
