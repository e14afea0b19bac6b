//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Upper bound for multipart uploads; a voice letter is minutes of m4a,
/// far below this.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let audio_routes = Router::new()
        .route("/audio", post(handlers::create_audio))
        .route("/audio/{id}", get(handlers::get_audio))
        .route("/audio/file/{id}", get(handlers::download_audio))
        .route("/audio/owner/{id}", get(handlers::audios_by_owner))
        .route("/audio/receiver/{id}", get(handlers::audios_by_receiver))
        .route("/audio/recommend/title", post(handlers::recommend_title))
        .route("/audio/recommend/text", post(handlers::recommend_text))
        .route("/audio/text", post(handlers::transcribe_audio))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    let member_routes = Router::new()
        .route("/member", post(handlers::login))
        .route("/member/{id}", get(handlers::get_member))
        .route("/member/follow", post(handlers::create_follow));

    Router::new()
        .merge(audio_routes)
        .merge(member_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
