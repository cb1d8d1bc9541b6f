use sqlx::SqlitePool;

use crate::database::messages::MessageRepository;
use crate::database::models::Message;
use crate::database::page::PageRequest;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Message not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Business operations on messages, always on behalf of one authenticated
/// owner. A missing row and a row held by someone else both come back as
/// NotFound, so callers cannot probe which ids exist.
#[derive(Clone)]
pub struct MessageService {
    repository: MessageRepository,
}

impl MessageService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: MessageRepository::new(pool),
        }
    }

    pub async fn get_by_id_for_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Message, MessageError> {
        self.repository
            .find_by_id_and_owner(id, owner)
            .await?
            .ok_or(MessageError::NotFound)
    }

    pub async fn list_for_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Vec<Message>, MessageError> {
        Ok(self.repository.find_page_by_owner(owner, page).await?)
    }

    pub async fn create(&self, title: &str, owner: &str) -> Result<Message, MessageError> {
        Ok(self.repository.insert(title, owner).await?)
    }

    /// Resolves the row for this owner first, then replaces the title. Both
    /// statements are owner-scoped, so a mismatch at either step is NotFound.
    pub async fn update(
        &self,
        id: i64,
        owner: &str,
        title: &str,
    ) -> Result<Message, MessageError> {
        self.get_by_id_for_owner(id, owner).await?;

        self.repository
            .update_title(id, owner, title)
            .await?
            .ok_or(MessageError::NotFound)
    }

    pub async fn delete(&self, id: i64, owner: &str) -> Result<(), MessageError> {
        self.get_by_id_for_owner(id, owner).await?;

        if self.repository.delete(id, owner).await? {
            Ok(())
        } else {
            Err(MessageError::NotFound)
        }
    }
}
