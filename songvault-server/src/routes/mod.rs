use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use songvault_config::CorsConfig;
use tracing::warn;

use crate::{
    handlers::{
        health::{health_handler, ping_handler},
        songs,
    },
    infra::app_state::AppState,
};

pub const UPLOAD: &str = "/upload";
pub const SONGS: &str = "/songs";
pub const SONG: &str = "/songs/{id}";
pub const AUDIO: &str = "/audio/{id}";

/// Song routes, mounted under `/api` by [`create_app`].
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(
            UPLOAD,
            post(songs::upload_songs).layer(DefaultBodyLimit::disable()),
        )
        .route(SONGS, get(songs::list_songs))
        .route(SONG, delete(songs::delete_song))
        .route(AUDIO, get(songs::stream_song))
}

pub fn create_app(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config().cors);

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .nest("/api", create_api_router())
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when the list is empty or contains `*`, otherwise exactly the
/// listed origins.
fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if cors.is_permissive() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}
