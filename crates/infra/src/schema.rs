//! Table bootstrap for the Postgres adapter.
//!
//! Statements are idempotent (`IF NOT EXISTS`) and run once at startup.

use sqlx::PgPool;

pub const CREATE_MOVIES: &str = r#"
    CREATE TABLE IF NOT EXISTS movies (
        id          BIGSERIAL PRIMARY KEY,
        title       TEXT NOT NULL CHECK (length(btrim(title)) > 0),
        director    TEXT NOT NULL CHECK (length(btrim(director)) > 0),
        year        INTEGER NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

pub const CREATE_DIRECTORS: &str = r#"
    CREATE TABLE IF NOT EXISTS directors (
        id          BIGSERIAL PRIMARY KEY,
        name        TEXT NOT NULL CHECK (length(btrim(name)) > 0),
        birth_year  INTEGER NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

pub const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id             BIGSERIAL PRIMARY KEY,
        username       TEXT NOT NULL UNIQUE CHECK (username = lower(username)),
        password_hash  TEXT NOT NULL,
        role           TEXT NOT NULL DEFAULT 'user',
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// Create every table the service needs.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    for (table, ddl) in [
        ("movies", CREATE_MOVIES),
        ("directors", CREATE_DIRECTORS),
        ("users", CREATE_USERS),
    ] {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!(table, "table ready");
    }
    Ok(())
}
