use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub mod password;
pub mod store;

pub use store::{DbUsers, InMemoryUsers, UserRecord, UserStore};

/// Role a caller must hold to reach any /messages route.
pub const MESSAGE_ACCESS_ROLE: &str = "USER";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Space-delimited role names, OAuth2 scope style.
    pub scope: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: &str, roles: &[String], ttl_secs: i64) -> Self {
        let now = Utc::now();

        Self {
            sub: username.to_string(),
            scope: roles.join(" "),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn roles(&self) -> Vec<String> {
        self.scope.split_whitespace().map(str::to_string).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid bearer token")]
    InvalidToken,
    #[error("Token generation error: {0}")]
    TokenGeneration(String),
    #[error("Password hash error: {0}")]
    PasswordHash(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Encoding and decoding halves of the signing secret, derived once at
/// startup and cloned into every handler that needs them.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

pub fn issue_token(keys: &TokenKeys, claims: &Claims) -> Result<String, AuthError> {
    encode(&Header::default(), claims, &keys.encoding)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn verify_token(keys: &TokenKeys, token: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}

/// Everything the auth layer needs at request time.
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserStore>,
    pub keys: TokenKeys,
    pub token_ttl_secs: i64,
}

impl AuthState {
    pub fn new(users: Arc<dyn UserStore>, keys: TokenKeys, token_ttl_secs: i64) -> Self {
        Self {
            users,
            keys,
            token_ttl_secs,
        }
    }
}
