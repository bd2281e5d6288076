//! HTTP route definitions

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::app::AppState;
use crate::http::reload::reload_events_handler;
use crate::util::time::uptime_secs;
use crate::ws::handler::ws_handler;

/// Build the application router.
///
/// Static assets are served from the configured public directory; ServeDir
/// resolves paths under that root only and answers 404 for misses, which is
/// exactly the lookup contract the original client expects.
pub fn build_router(state: AppState) -> Router {
    let serve_dir = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .route("/events", get(reload_events_handler))
        .fallback_service(serve_dir)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    participants: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        participants: state.room.participant_count(),
    })
}
