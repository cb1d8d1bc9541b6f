use sqlx::SqlitePool;

use crate::database::models::Message;
use crate::database::page::PageRequest;

/// Data access for the message table. Every query carries the owner in its
/// WHERE clause, so rows belonging to other users are invisible here.
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "SELECT id, title, owner FROM message WHERE id = ? AND owner = ?",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_page_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Vec<Message>, sqlx::Error> {
        // Sort column and direction come from whitelisted enums, never from
        // raw user input, so interpolating them here is safe.
        let sql = format!(
            "SELECT id, title, owner FROM message WHERE owner = ? \
             ORDER BY {} {} LIMIT ? OFFSET ?",
            page.sort.as_sql(),
            page.direction.as_sql(),
        );

        sqlx::query_as::<_, Message>(&sql)
            .bind(owner)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn insert(&self, title: &str, owner: &str) -> Result<Message, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO message (title, owner) VALUES (?, ?) RETURNING id, title, owner",
        )
        .bind(title)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
    }

    /// Returns the updated row, or None when no row matches id and owner.
    pub async fn update_title(
        &self,
        id: i64,
        owner: &str,
        title: &str,
    ) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "UPDATE message SET title = ? WHERE id = ? AND owner = ? \
             RETURNING id, title, owner",
        )
        .bind(title)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
    }

    /// Returns true when a row was deleted.
    pub async fn delete(&self, id: i64, owner: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM message WHERE id = ? AND owner = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
