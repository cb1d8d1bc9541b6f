// HTTP API error types
use axum::{
    extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthError;
use crate::database::page::PageParamError;
use crate::services::message_service::MessageError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, field_errors } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert domain error types to ApiError
impl From<MessageError> for ApiError {
    fn from(err: MessageError) -> Self {
        match err {
            // Absent row and ownership mismatch share this arm on purpose:
            // callers must not be able to tell the two apart.
            MessageError::NotFound => ApiError::not_found("Message not found"),
            MessageError::Database(sqlx_err) => match sqlx_err {
                // The pool cannot hand out a connection; a retry may succeed.
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                    ApiError::service_unavailable("Database temporarily unavailable")
                }
                other => {
                    // Don't expose internal SQL errors to clients
                    tracing::error!("Database error: {}", other);
                    ApiError::internal_server_error(
                        "An error occurred while processing your request",
                    )
                }
            },
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::unauthorized("Missing credentials"),
            AuthError::InvalidCredentials => ApiError::unauthorized("Invalid credentials"),
            AuthError::InvalidToken => ApiError::unauthorized("Invalid bearer token"),
            AuthError::TokenGeneration(msg) => {
                tracing::error!("Token generation failed: {}", msg);
                ApiError::internal_server_error("Failed to issue token")
            }
            AuthError::PasswordHash(msg) => {
                tracing::error!("Password hashing failed: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            AuthError::Database(sqlx_err) => match sqlx_err {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                    ApiError::service_unavailable("Database temporarily unavailable")
                }
                other => {
                    tracing::error!("User store query failed: {}", other);
                    ApiError::internal_server_error(
                        "An error occurred while processing your request",
                    )
                }
            },
        }
    }
}

impl From<PageParamError> for ApiError {
    fn from(err: PageParamError) -> Self {
        let field = match &err {
            PageParamError::NegativePage => "page",
            PageParamError::NonPositiveSize => "size",
            PageParamError::UnknownSortField(_) => "sort",
            PageParamError::InvalidDirection(_) => "direction",
        };

        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), err.to_string());
        ApiError::validation_error("Invalid paging parameters", Some(field_errors))
    }
}

// Bodies the Json extractor cannot read (bad syntax, wrong types) surface as
// a 400 rather than axum's stock rejection statuses.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_json(rejection.body_text())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_pool_reads_as_service_unavailable() {
        let err: ApiError = MessageError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.error_code(), "SERVICE_UNAVAILABLE");

        let err: ApiError = AuthError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn other_database_failures_stay_internal() {
        let err: ApiError = MessageError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn invalid_json_is_a_400_with_its_own_code() {
        let err = ApiError::invalid_json("Expected JSON object");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["code"], "INVALID_JSON");
        assert_eq!(err.to_json()["message"], "Expected JSON object");
    }
}
