pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{AuthState, TokenKeys, UserStore};
use crate::config::SecurityConfig;
use crate::services::MessageService;

/// Shared state cloned into every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub messages: MessageService,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(pool: SqlitePool, users: Arc<dyn UserStore>, security: &SecurityConfig) -> Self {
        let messages = MessageService::new(pool.clone());
        let auth = AuthState::new(
            users,
            TokenKeys::from_secret(&security.jwt_secret),
            security.token_ttl_secs,
        );

        Self {
            pool,
            messages,
            auth,
        }
    }
}

/// Assemble the full router. The message routes additionally require the
/// USER role; / and /token require only authentication; /health is public.
pub fn app(state: AppState) -> Router {
    use crate::handlers::{home, messages, token};

    let message_routes = Router::new()
        .route(
            "/messages",
            get(messages::message_list).post(messages::message_create),
        )
        .route(
            "/messages/:id",
            get(messages::message_get)
                .put(messages::message_update)
                .delete(messages::message_delete),
        )
        .route_layer(from_fn(middleware::require_message_role));

    Router::new()
        .route("/", get(home::home))
        .route("/token", post(token::token_post))
        .merge(message_routes)
        // Added after the routes above, so it wraps them all and runs first.
        .route_layer(from_fn_with_state(state.clone(), middleware::authenticate))
        .route("/health", get(home::health))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
