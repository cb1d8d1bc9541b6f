use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use message_api::auth::{DbUsers, InMemoryUsers, UserStore};
use message_api::config::{AppConfig, UserStoreKind};
use message_api::{app, database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("message_api=debug,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();

    let pool = database::connect(&config.database)
        .await
        .context("failed to open database")?;

    let users: Arc<dyn UserStore> = match config.security.user_store {
        UserStoreKind::Memory => Arc::new(InMemoryUsers::demo()?),
        UserStoreKind::Database => {
            let store = DbUsers::new(pool.clone());
            if store.is_empty().await? {
                tracing::info!("User tables empty, seeding demo accounts");
                store.seed_demo_users().await?;
            }
            Arc::new(store)
        }
    };

    let state = AppState::new(pool, users, &config.security);
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Message API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
