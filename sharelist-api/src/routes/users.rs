/// User directory endpoint
///
/// `GET /v1/users/lookup?email=` — the point query the add-collaborator
/// action performs: does an account with this email exist? The email is
/// normalized (trim + lowercase) before the lookup, matching how it was
/// stored at registration. The check happens once, at add time; it is never
/// re-evaluated for collaborators already on a list.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sharelist_shared::{auth::identity::Identity, draft, models::user::User};

/// Lookup query parameters
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// Email to look up
    pub email: String,
}

/// Directory entry returned on a hit
#[derive(Debug, Serialize)]
pub struct DirectoryEntry {
    /// Normalized email
    pub email: String,

    /// Display name, if the user set one
    pub display_name: Option<String>,
}

/// Directory point query handler
///
/// # Errors
///
/// - `422 Unprocessable Entity`: empty email
/// - `404 Not Found`: no account with this email
pub async fn lookup(
    State(state): State<AppState>,
    Extension(_identity): Extension<Identity>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<Json<DirectoryEntry>> {
    let email = draft::normalize_collaborator_email(&query.email)
        .ok_or_else(|| ApiError::invalid_field("email", "Please enter an email"))?;

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User with this email does not exist".to_string()))?;

    Ok(Json(DirectoryEntry {
        email: user.email,
        display_name: user.display_name,
    }))
}
