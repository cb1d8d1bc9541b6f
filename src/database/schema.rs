use sqlx::SqlitePool;

/// DDL executed at startup. AUTOINCREMENT keeps message ids monotonic so a
/// deleted id is never handed out again.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS message (
        id     INTEGER PRIMARY KEY AUTOINCREMENT,
        title  TEXT NOT NULL,
        owner  TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_message_owner ON message(owner)",
    "CREATE TABLE IF NOT EXISTS user_entity (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        username  TEXT NOT NULL UNIQUE,
        password  TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS role (
        id    INTEGER PRIMARY KEY AUTOINCREMENT,
        name  TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS user_roles (
        user_id  INTEGER NOT NULL REFERENCES user_entity(id),
        role_id  INTEGER NOT NULL REFERENCES role(id),
        UNIQUE(user_id, role_id)
    )",
];

pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
