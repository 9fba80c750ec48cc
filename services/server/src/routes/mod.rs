//! Playdeck server routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{middleware::auth_middleware, state::AppState};

pub mod auth;
pub mod playlists;
pub mod search;
pub mod upload;

/// Create the router for the Playdeck server
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/playlists",
            get(playlists::list).post(playlists::replace_all),
        )
        .route("/api/playlists/:id", delete(playlists::delete_playlist))
        .route(
            "/api/playlists/:id/tracks",
            get(playlists::track_view).post(playlists::add_track),
        )
        .route(
            "/api/playlists/:id/tracks/:track_id",
            delete(playlists::remove_track),
        )
        .route("/api/search", get(search::search))
        .route(
            "/api/upload",
            post(upload::upload)
                // multipart framing overhead on top of the file limit
                .layer(DefaultBodyLimit::max(state.upload_store.max_bytes() + 64 * 1024)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(state.upload_store.dir()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "playdeck-server"
    }))
}
