use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;

use message_api::auth::{InMemoryUsers, UserStore};
use message_api::config::{SecurityConfig, UserStoreKind};
use message_api::database::schema;
use message_api::{app, AppState};

pub struct TestServer {
    pub base_url: String,
}

/// Boot the app on an ephemeral port with a fresh in-memory database and the
/// demo accounts. Every caller gets fully isolated state.
pub async fn spawn_server() -> Result<TestServer> {
    // A single connection keeps the in-memory database alive and shared
    // across the server's requests.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .context("failed to open in-memory database")?;
    schema::init(&pool).await.context("failed to create schema")?;

    let users: Arc<dyn UserStore> =
        Arc::new(InMemoryUsers::demo().context("failed to build demo users")?);

    let security = SecurityConfig {
        jwt_secret: "integration-test-secret".to_string(),
        token_ttl_secs: 3600,
        user_store: UserStoreKind::Memory,
    };

    let state = AppState::new(pool, users, &security);
    let router = app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
    })
}
