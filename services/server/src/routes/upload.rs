//! Audio upload route

use axum::{
    Extension, Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    state::AppState,
    storage::{UploadError, UploadMeta},
};

/// Upload an MP3 file and attach it to a playlist
///
/// Multipart fields: `file` (required), plus optional `title`, `artist`,
/// `duration`, and `playlist_id`. When no playlist exists yet one is
/// created; when `playlist_id` is absent or unknown the first playlist
/// receives the track.
pub async fn upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut meta = UploadMeta::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart body".to_string()))?
    {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some("file") => {
                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "upload.mp3".to_string());
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_default();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::Validation("Failed to read uploaded file".to_string()))?;

                file = Some((original_name, content_type, bytes.to_vec()));
            }
            Some("title") => meta.title = read_text(field).await?,
            Some("artist") => meta.artist = read_text(field).await?,
            Some("duration") => meta.duration = read_text(field).await?,
            Some("playlist_id") => meta.playlist_id = read_text(field).await?,
            _ => {}
        }
    }

    let (original_name, content_type, bytes) = file.ok_or(UploadError::MissingFile)?;

    let blob = state
        .upload_store
        .store(&original_name, &content_type, &bytes)
        .await?;

    let track = state
        .playlist_service
        .attach_upload(&user.username, blob, meta)
        .await?;

    info!("Upload complete for user: {}", user.username);

    Ok(Json(json!({
        "success": true,
        "message": "File uploaded and added to playlist",
        "track": track
    })))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<Option<String>> {
    let text = field
        .text()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart field".to_string()))?;

    Ok(Some(text).filter(|t| !t.trim().is_empty()))
}
