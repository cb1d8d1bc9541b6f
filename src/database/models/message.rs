use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored message. `owner` is the username it belongs to; it never appears
/// in request payloads and is always taken from the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub title: String,
    pub owner: String,
}
