use axum::{
    extract::{Extension, State},
    response::Json,
};
use serde::Serialize;

use crate::auth::{issue_token, Claims};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// POST /token - exchange already-verified credentials for a bearer token
/// carrying the caller's username and roles.
pub async fn token_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TokenResponse>, ApiError> {
    let claims = Claims::new(&user.username, &user.roles, state.auth.token_ttl_secs);
    let token = issue_token(&state.auth.keys, &claims)?;

    tracing::debug!("Issued token for {}", user.username);

    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in: state.auth.token_ttl_secs,
    }))
}
