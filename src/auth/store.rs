use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::auth::{password, AuthError};

/// Built-in accounts used for demos and tests. hank's only role is
/// NON-USER, so they can authenticate but never reach the message routes.
pub const DEMO_USERS: &[(&str, &str, &[&str])] = &[
    ("jack", "asd", &["USER"]),
    ("ann", "zxc", &["USER"]),
    ("hank", "qwe", &["NON-USER"]),
];

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Where user accounts live. The server is handed one implementation at
/// startup; handlers never care which.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str)
        -> Result<Option<UserRecord>, AuthError>;
}

/// Fixed account set resolved entirely in memory.
pub struct InMemoryUsers {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
        }
    }

    pub fn with_user(
        mut self,
        username: &str,
        password: &str,
        roles: &[&str],
    ) -> Result<Self, AuthError> {
        let record = UserRecord {
            username: username.to_string(),
            password_hash: password::hash_password(password)?,
            roles: roles.iter().map(|role| role.to_string()).collect(),
        };
        self.users.insert(username.to_string(), record);
        Ok(self)
    }

    pub fn demo() -> Result<Self, AuthError> {
        let mut store = Self::new();
        for (username, password, roles) in DEMO_USERS {
            store = store.with_user(username, password, roles)?;
        }
        Ok(store)
    }
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.users.get(username).cloned())
    }
}

/// Accounts stored in the user_entity / role / user_roles tables.
pub struct DbUsers {
    pool: SqlitePool,
}

impl DbUsers {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn is_empty(&self) -> Result<bool, AuthError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_entity")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 == 0)
    }

    pub async fn insert_user(
        &self,
        username: &str,
        password: &str,
        roles: &[&str],
    ) -> Result<(), AuthError> {
        let hash = password::hash_password(password)?;

        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO user_entity (username, password) VALUES (?, ?) RETURNING id",
        )
        .bind(username)
        .bind(&hash)
        .fetch_one(&self.pool)
        .await?;

        for role in roles {
            let role_id = self.role_id(role).await?;
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(role_id)
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    pub async fn seed_demo_users(&self) -> Result<(), AuthError> {
        for (username, password, roles) in DEMO_USERS {
            self.insert_user(username, password, roles).await?;
        }
        Ok(())
    }

    async fn role_id(&self, name: &str) -> Result<i64, AuthError> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM role WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let id = sqlx::query_scalar("INSERT INTO role (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }
}

#[async_trait]
impl UserStore for DbUsers {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, AuthError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT username, password FROM user_entity WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        let Some((username, password_hash)) = row else {
            return Ok(None);
        };

        let roles: Vec<String> = sqlx::query_scalar(
            "SELECT r.name FROM role r \
             JOIN user_roles ur ON ur.role_id = r.id \
             JOIN user_entity u ON u.id = ur.user_id \
             WHERE u.username = ? \
             ORDER BY r.name",
        )
        .bind(&username)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(UserRecord {
            username,
            password_hash,
            roles,
        }))
    }
}
