//! Bearer token authentication middleware.
//!
//! Checks Authorization: Bearer <token> headers, verifies the JWT,
//! and sets the user context in request extensions.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Middleware to authenticate Bearer JWT tokens.
///
/// If a valid Bearer token is present, sets [`AuthUser`] in request
/// extensions. If no token is present, passes through without
/// modification. If an invalid token is present, returns 401.
pub async fn authenticate_bearer_token(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let Some(auth_header) = auth_header else {
        return next.run(request).await;
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return next.run(request).await;
    };

    let claims = match state.tokens().verify(token) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "invalid bearer token");
            return AppError::Unauthorized.into_response();
        }
    };

    let Ok(user_id) = claims.sub.parse::<Uuid>() else {
        debug!(sub = %claims.sub, "invalid user ID in token");
        return AppError::Unauthorized.into_response();
    };

    request.extensions_mut().insert(AuthUser { user_id });

    next.run(request).await
}

/// Authentication info extracted from a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}
