//! Catalog search route

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{error::ApiResult, middleware::AuthUser, state::AppState};

/// Query parameters for catalog search
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search the video catalog
///
/// Results are forwarded as-is; the caller feeds chosen entries back into
/// the add-track endpoint.
pub async fn search(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    info!("Catalog search by {}: {}", user.username, query.q);

    let items = state.catalog_client.search(&query.q).await?;

    Ok(Json(json!({ "items": items })))
}
