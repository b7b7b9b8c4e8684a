//! Authentication routes (register, login, current user).

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{CreateUser, User};
use crate::state::AppState;

use super::DataResponse;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token response for register/login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
}

/// Register a new user and issue a signed token.
///
/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if !input.email.contains('@') {
        return Err(AppError::Validation(
            "a valid email is required".to_string(),
        ));
    }
    if input.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if let Some(role) = input.role.as_deref() {
        if role != "user" && role != "publisher" {
            return Err(AppError::Validation(
                "role must be 'user' or 'publisher'".to_string(),
            ));
        }
    }

    // The unique index is the backstop; this check gives a clean 400.
    if User::find_by_email(state.db(), &input.email).await?.is_some() {
        return Err(AppError::Validation(
            "email is already registered".to_string(),
        ));
    }

    let user = User::create(state.db(), input).await?;
    let token = state.tokens().sign(user.id)?;

    info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(TokenResponse {
        success: true,
        token,
    })))
}

/// Verify credentials and issue a signed token.
///
/// POST /api/v1/auth/login
///
/// Unknown email and wrong password return the same generic 401 so
/// the response does not reveal whether the email exists.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let Some(user) = User::find_by_email(state.db(), &input.email).await? else {
        return Err(AppError::Unauthorized);
    };

    if !user.verify_password(&input.password) {
        return Err(AppError::Unauthorized);
    }

    let token = state.tokens().sign(user.id)?;

    info!(user_id = %user.id, "user logged in");

    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

/// Return the authenticated user.
///
/// GET /api/v1/auth/me (requires a bearer token)
async fn me(
    State(state): State<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> AppResult<Json<DataResponse<User>>> {
    let Some(Extension(auth)) = auth else {
        return Err(AppError::Unauthorized);
    };

    let user = User::find_by_id(state.db(), auth.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(DataResponse::new(user)))
}
