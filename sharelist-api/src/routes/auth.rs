/// Authentication endpoints
///
/// - `POST /v1/auth/register` — create an account and get tokens
/// - `POST /v1/auth/login` — authenticate and get tokens
/// - `POST /v1/auth/refresh` — exchange a refresh token for a new access token
///
/// Registration also creates the directory entry collaborator-email lookups
/// query against: the account row and the directory entry are one and the
/// same. Emails are normalized (trim + lowercase) before storage so later
/// lookups hit them.

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sharelist_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password; the provider's only rule is the minimum length
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Display name shown to collaborators
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub display_name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Token pair returned by register and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// User ID
    pub user_id: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Register a new user
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `409 Conflict`: email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(validation_details)?;

    password::validate_password(&req.password)
        .map_err(|msg| ApiError::invalid_field("password", msg))?;

    let email = req.email.trim().to_lowercase();
    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
            display_name: Some(req.display_name.trim().to_string()),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "Registered new user");

    Ok(Json(issue_tokens(&user, state.jwt_secret())?))
}

/// Login
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(validation_details)?;

    let email = req.email.trim().to_lowercase();
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    User::update_last_login(&state.db, user.id).await?;

    Ok(Json(issue_tokens(&user, state.jwt_secret())?))
}

/// Exchange a refresh token for a new access token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

fn issue_tokens(user: &User, secret: &str) -> Result<TokenResponse, ApiError> {
    let access = jwt::Claims::new(user.id, &user.email, jwt::TokenType::Access);
    let refresh = jwt::Claims::new(user.id, &user.email, jwt::TokenType::Refresh);

    Ok(TokenResponse {
        user_id: user.id.to_string(),
        access_token: jwt::create_token(&access, secret)?,
        refresh_token: jwt::create_token(&refresh, secret)?,
    })
}
