use std::env;

/// Application configuration, assembled once at startup and passed down
/// explicitly. The user store in particular is an instance handed to the auth
/// layer, never a process-wide static.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub user_store: UserStoreKind,
}

/// Which credential store backs authentication. The two are
/// interchangeable; handlers never see the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStoreKind {
    /// Fixed set of users built at startup
    Memory,
    /// user_entity / role / user_roles tables
    Database,
}

impl UserStoreKind {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "database" | "db" | "table" => UserStoreKind::Database,
            _ => UserStoreKind::Memory,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                // mode=rwc creates the file on first boot
                url: "sqlite:message_api.db?mode=rwc".to_string(),
                max_connections: 5,
            },
            security: SecurityConfig {
                jwt_secret: "dev-secret-change-me".to_string(),
                token_ttl_secs: 3600,
                user_store: UserStoreKind::Memory,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides (PORT kept as a deployment-friendly fallback)
        if let Ok(v) = env::var("MESSAGE_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("TOKEN_TTL_SECS") {
            self.security.token_ttl_secs = v.parse().unwrap_or(self.security.token_ttl_secs);
        }
        if let Ok(v) = env::var("AUTH_USER_STORE") {
            self.security.user_store = UserStoreKind::parse(&v);
        }

        self
    }
}
