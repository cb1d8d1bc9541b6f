pub mod messages;
pub mod models;
pub mod page;
pub mod schema;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Open the connection pool and make sure the schema exists.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    schema::init(&pool).await?;

    info!("Database ready at {}", config.url);
    Ok(pool)
}
