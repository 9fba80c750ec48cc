//! Authentication routes

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{NewUser, PublicUser},
    state::AppState,
    validation,
};

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    info!("Registration request for user: {}", payload.username);

    validation::validate_username(&payload.username).map_err(ApiError::Validation)?;
    validation::validate_password(&payload.password).map_err(ApiError::Validation)?;
    validation::validate_display_name(&payload.name).map_err(ApiError::Validation)?;
    if let Some(image_url) = &payload.image_url {
        validation::validate_image_url(image_url).map_err(ApiError::Validation)?;
    }

    state.user_repository.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully"
        })),
    ))
}

/// Log a user in, returning a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for user: {}", payload.username);

    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let user = state
        .user_repository
        .authenticate(&payload.username, &payload.password)
        .await?;

    let token = state.jwt_service.issue(&user).map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: user.public(),
    }))
}

/// Return the authenticated user extracted from the verified token
pub async fn me(Extension(user): Extension<AuthUser>) -> impl IntoResponse {
    Json(json!({
        "user": {
            "username": user.username,
            "name": user.name,
            "image_url": user.image_url,
        }
    }))
}

/// Log out
///
/// Tokens are stateless, so this is an acknowledgement; the client drops
/// its copy of the token.
pub async fn logout(Extension(user): Extension<AuthUser>) -> impl IntoResponse {
    info!("Logout for user: {}", user.username);

    Json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
}
