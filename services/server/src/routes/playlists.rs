//! Playlist routes
//!
//! Thin handlers over the playlist service: each one extracts the
//! authenticated owner, forwards to the service, and shapes the JSON
//! response. Sorting and filtering happen here on an in-memory copy and
//! never touch persisted state.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        NewTrack, Playlist,
        playlist::{SortKey, filtered_tracks, sorted_tracks},
    },
    state::AppState,
};

/// Request body for replacing the whole collection
#[derive(Deserialize)]
pub struct ReplaceAllRequest {
    pub playlists: Vec<Playlist>,
}

/// Query parameters for the derived track view
#[derive(Deserialize)]
pub struct TrackViewQuery {
    pub sort: Option<SortKey>,
    pub filter: Option<String>,
}

/// List all playlists for the authenticated owner
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let collection = state.playlist_service.list(&user.username).await?;
    Ok(Json(collection))
}

/// Replace the owner's entire playlist collection
pub async fn replace_all(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ReplaceAllRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .playlist_service
        .replace_all(&user.username, payload.playlists)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Playlists saved successfully"
    })))
}

/// Delete one playlist
pub async fn delete_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(playlist_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state
        .playlist_service
        .delete(&user.username, &playlist_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Playlist deleted successfully"
    })))
}

/// Add a catalog track to a playlist
pub async fn add_track(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(playlist_id): Path<String>,
    Json(payload): Json<NewTrack>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state
        .playlist_service
        .add_track(&user.username, &playlist_id, payload)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Track added to playlist successfully",
        "playlist": playlist
    })))
}

/// Remove a track from a playlist
pub async fn remove_track(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((playlist_id, track_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state
        .playlist_service
        .remove_track(&user.username, &playlist_id, &track_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Track removed from playlist successfully",
        "playlist": playlist
    })))
}

/// Sorted/filtered view of one playlist's tracks
pub async fn track_view(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(playlist_id): Path<String>,
    Query(query): Query<TrackViewQuery>,
) -> ApiResult<impl IntoResponse> {
    let collection = state.playlist_service.list(&user.username).await?;

    let playlist = collection
        .playlists
        .iter()
        .find(|p| p.id == playlist_id)
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_string()))?;

    let mut tracks = match &query.filter {
        Some(filter) if !filter.trim().is_empty() => filtered_tracks(&playlist.tracks, filter),
        _ => playlist.tracks.clone(),
    };

    if let Some(sort) = query.sort {
        tracks = sorted_tracks(&tracks, sort);
    }

    Ok(Json(json!({ "tracks": tracks })))
}
