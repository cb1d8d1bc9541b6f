use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use crate::database::models::Message;
use crate::database::page::PageRequest;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// Incoming message body. Every field is optional so a missing title maps to
/// our own validation error rather than a deserialization rejection; bodies
/// that cannot be read as this shape at all become INVALID_JSON 400s. Id and
/// owner are accepted but ignored; the server assigns both.
#[derive(Debug, Deserialize)]
pub struct MessagePayload {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub owner: Option<String>,
}

/// GET /messages - one page of the caller's messages
pub async fn message_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let page = PageRequest::from_query(
        query.page,
        query.size,
        query.sort.as_deref(),
        query.direction.as_deref(),
    )?;

    let messages = state.messages.list_for_owner(&user.username, &page).await?;
    Ok(Json(messages))
}

/// GET /messages/:id - one message, 404 unless it exists and is the caller's
pub async fn message_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, ApiError> {
    let id = require_positive_id(id)?;

    let message = state
        .messages
        .get_by_id_for_owner(id, &user.username)
        .await?;
    Ok(Json(message))
}

/// POST /messages - create for the caller, 201 with a Location header and no
/// body
pub async fn message_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<MessagePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let title = require_title(&payload)?;

    let message = state.messages.create(title, &user.username).await?;

    let location = format!("/messages/{}", message.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

/// PUT /messages/:id - replace the title, 204 on success
pub async fn message_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    payload: Result<Json<MessagePayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = require_positive_id(id)?;
    let Json(payload) = payload?;
    let title = require_title(&payload)?;

    state.messages.update(id, &user.username, title).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /messages/:id - 204 on success
pub async fn message_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let id = require_positive_id(id)?;

    state.messages.delete(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn require_positive_id(id: i64) -> Result<i64, ApiError> {
    if id <= 0 {
        return Err(ApiError::bad_request("Message id must be a positive integer"));
    }
    Ok(id)
}

fn require_title(payload: &MessagePayload) -> Result<&str, ApiError> {
    match payload.title.as_deref() {
        Some(title) if !title.trim().is_empty() => Ok(title),
        _ => {
            let mut field_errors = HashMap::new();
            field_errors.insert("title".to_string(), "title must not be blank".to_string());
            Err(ApiError::validation_error(
                "Invalid message payload",
                Some(field_errors),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_ids_pass_through() {
        assert_eq!(require_positive_id(1).unwrap(), 1);
        assert_eq!(require_positive_id(i64::MAX).unwrap(), i64::MAX);
    }

    #[test]
    fn zero_and_negative_ids_are_rejected() {
        assert!(require_positive_id(0).is_err());
        assert!(require_positive_id(-7).is_err());
    }

    #[test]
    fn blank_titles_are_rejected() {
        let missing = MessagePayload { id: None, title: None, owner: None };
        assert!(require_title(&missing).is_err());

        let blank = MessagePayload {
            id: None,
            title: Some("   ".to_string()),
            owner: None,
        };
        assert!(require_title(&blank).is_err());
    }

    #[test]
    fn present_title_is_returned_as_is() {
        let payload = MessagePayload {
            id: Some(42),
            title: Some("hello".to_string()),
            owner: Some("someone-else".to_string()),
        };
        assert_eq!(require_title(&payload).unwrap(), "hello");
    }
}
