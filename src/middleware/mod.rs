pub mod auth;

pub use auth::{authenticate, require_message_role, AuthUser};
