use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::auth::{password, verify_token, AuthError, MESSAGE_ACCESS_ROLE};
use crate::error::ApiError;
use crate::AppState;

/// Authenticated caller context, injected as a request extension.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Authentication middleware accepting either Basic credentials checked
/// against the user store, or a Bearer token issued by POST /token. On
/// success the caller's identity is injected for downstream handlers.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = resolve_caller(&state, &headers).await?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Route guard for the message routes: authenticated callers without the
/// USER role are turned away with 403.
pub async fn require_message_role(request: Request, next: Next) -> Result<Response, ApiError> {
    let authorized = request
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.has_role(MESSAGE_ACCESS_ROLE))
        .unwrap_or(false);

    if !authorized {
        return Err(ApiError::forbidden("Access denied"));
    }

    Ok(next.run(request).await)
}

async fn resolve_caller(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MissingCredentials)?;

    if let Some(token) = header_value.strip_prefix("Bearer ") {
        let claims = verify_token(&state.auth.keys, token.trim())?;
        return Ok(AuthUser {
            username: claims.sub.clone(),
            roles: claims.roles(),
        });
    }

    if let Some(encoded) = header_value.strip_prefix("Basic ") {
        let (username, password) = decode_basic(encoded.trim())?;

        let record = state
            .auth
            .users
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(&password, &record.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        return Ok(AuthUser {
            username: record.username,
            roles: record.roles,
        });
    }

    Err(AuthError::MissingCredentials.into())
}

/// Splits a Basic payload into username and password. The password may
/// itself contain colons, so only the first one separates the two.
fn decode_basic(encoded: &str) -> Result<(String, String), AuthError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| AuthError::InvalidCredentials)?;
    let text = String::from_utf8(bytes).map_err(|_| AuthError::InvalidCredentials)?;

    let (username, password) = text
        .split_once(':')
        .ok_or(AuthError::InvalidCredentials)?;

    Ok((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_username_and_password() {
        // "jack:asd"
        let (username, password) = decode_basic("amFjazphc2Q=").unwrap();
        assert_eq!(username, "jack");
        assert_eq!(password, "asd");
    }

    #[test]
    fn splits_at_first_colon_only() {
        let encoded = STANDARD.encode("jack:pass:word");
        let (username, password) = decode_basic(&encoded).unwrap();
        assert_eq!(username, "jack");
        assert_eq!(password, "pass:word");
    }

    #[test]
    fn rejects_payload_without_colon() {
        let encoded = STANDARD.encode("jackasd");
        assert!(matches!(
            decode_basic(&encoded),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_basic("%%%not-base64%%%"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
