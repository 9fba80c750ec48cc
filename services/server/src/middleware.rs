//! Middleware for JWT token validation and authentication

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information, extracted from verified token claims
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub name: String,
    pub image_url: String,
}

/// Extract and validate the JWT from the Authorization header
///
/// On success the [`AuthUser`] is inserted into the request extensions for
/// handlers to consume.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    let claims = state.jwt_service.verify(token).map_err(|e| {
        error!("Failed to validate token: {}", e);
        ApiError::Unauthenticated
    })?;

    req.extensions_mut().insert(AuthUser {
        username: claims.sub,
        name: claims.name,
        image_url: claims.image_url,
    });

    Ok(next.run(req).await)
}
