//! Postgres-backed record store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | RowNotFound / no row returned / 0 rows affected | N/A | `NotFound` |
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (not-null, check) | `23502`, `23514` | `Validation` |
//! | Database (bad text representation, out of range) | `22P02`, `22003` | `Validation` |
//! | Anything else | any | `Internal` |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use filmapi_core::{
    Director, DirectorFields, DirectorId, Movie, MovieFields, MovieId, NewUser, User, UserId, Username,
};

use super::r#trait::{RecordStore, StoreError, StoreResult};
use crate::schema;
use crate::user_store::UserStore;

/// Postgres adapter for every record type.
///
/// Uses the SQLx connection pool, which is thread-safe and shared by all
/// requests. Each operation is a single statement.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        schema::migrate(&self.pool).await
    }
}

#[derive(Debug, FromRow)]
struct MovieRow {
    id: i64,
    title: String,
    director: String,
    year: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: MovieId::from_i64(row.id),
            title: row.title,
            director: row.director,
            year: row.year,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct DirectorRow {
    id: i64,
    name: String,
    birth_year: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DirectorRow> for Director {
    fn from(row: DirectorRow) -> Self {
        Director {
            id: DirectorId::from_i64(row.id),
            name: row.name,
            birth_year: row.birth_year,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username)
            .map_err(|e| StoreError::Internal(format!("stored username is invalid: {e}")))?;
        Ok(User {
            id: UserId::from_i64(row.id),
            username,
            password_hash: row.password_hash,
            role: row.role,
            created_at: row.created_at,
        })
    }
}

const MOVIE_COLUMNS: &str = "id, title, director, year, created_at, updated_at";
const DIRECTOR_COLUMNS: &str = "id, name, birth_year, created_at, updated_at";
const USER_COLUMNS: &str = "id, username, password_hash, role, created_at";

#[async_trait]
impl RecordStore<Movie> for PostgresStore {
    #[instrument(skip_all, err)]
    async fn list(&self) -> StoreResult<Vec<Movie>> {
        let rows: Vec<MovieRow> = sqlx::query_as(&format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("movie", "list", e))?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn get(&self, id: MovieId) -> StoreResult<Movie> {
        let row: Option<MovieRow> = sqlx::query_as(&format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("movie", "get", e))?;
        row.map(Movie::from).ok_or(StoreError::NotFound("movie"))
    }

    #[instrument(skip_all, err)]
    async fn create(&self, fields: MovieFields) -> StoreResult<Movie> {
        let row: MovieRow = sqlx::query_as(&format!(
            "INSERT INTO movies (title, director, year) VALUES ($1, $2, $3) RETURNING {MOVIE_COLUMNS}"
        ))
        .bind(fields.title)
        .bind(fields.director)
        .bind(fields.year)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("movie", "create", e))?;
        Ok(row.into())
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn replace(&self, id: MovieId, fields: MovieFields) -> StoreResult<Movie> {
        let row: Option<MovieRow> = sqlx::query_as(&format!(
            "UPDATE movies SET title = $2, director = $3, year = $4, updated_at = now() \
             WHERE id = $1 RETURNING {MOVIE_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(fields.title)
        .bind(fields.director)
        .bind(fields.year)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("movie", "replace", e))?;
        row.map(Movie::from).ok_or(StoreError::NotFound("movie"))
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn delete(&self, id: MovieId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("movie", "delete", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("movie"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore<Director> for PostgresStore {
    #[instrument(skip_all, err)]
    async fn list(&self) -> StoreResult<Vec<Director>> {
        let rows: Vec<DirectorRow> =
            sqlx::query_as(&format!("SELECT {DIRECTOR_COLUMNS} FROM directors ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("director", "list", e))?;
        Ok(rows.into_iter().map(Director::from).collect())
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn get(&self, id: DirectorId) -> StoreResult<Director> {
        let row: Option<DirectorRow> =
            sqlx::query_as(&format!("SELECT {DIRECTOR_COLUMNS} FROM directors WHERE id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("director", "get", e))?;
        row.map(Director::from).ok_or(StoreError::NotFound("director"))
    }

    #[instrument(skip_all, err)]
    async fn create(&self, fields: DirectorFields) -> StoreResult<Director> {
        let row: DirectorRow = sqlx::query_as(&format!(
            "INSERT INTO directors (name, birth_year) VALUES ($1, $2) RETURNING {DIRECTOR_COLUMNS}"
        ))
        .bind(fields.name)
        .bind(fields.birth_year)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("director", "create", e))?;
        Ok(row.into())
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn replace(&self, id: DirectorId, fields: DirectorFields) -> StoreResult<Director> {
        let row: Option<DirectorRow> = sqlx::query_as(&format!(
            "UPDATE directors SET name = $2, birth_year = $3, updated_at = now() \
             WHERE id = $1 RETURNING {DIRECTOR_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(fields.name)
        .bind(fields.birth_year)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("director", "replace", e))?;
        row.map(Director::from).ok_or(StoreError::NotFound("director"))
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn delete(&self, id: DirectorId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM directors WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("director", "delete", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("director"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip_all, fields(username = %user.username), err)]
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(user.username.as_str())
        .bind(user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("user", "create_user", e))?;
        row.try_into()
    }

    #[instrument(skip_all, fields(username = %username), err)]
    async fn find_user_by_username(&self, username: &Username) -> StoreResult<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("user", "find_user_by_username", e))?;
        row.ok_or(StoreError::NotFound("user"))?.try_into()
    }
}

fn map_sqlx_error(kind: &'static str, operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound(kind),
        sqlx::Error::Database(db_err) => {
            let msg = db_err.message().to_string();
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("23502" | "23514" | "22P02" | "22003") => StoreError::Validation(msg),
                _ => StoreError::Internal(format!("database error in {kind} {operation}: {msg}")),
            }
        }
        other => StoreError::Internal(format!("sqlx error in {kind} {operation}: {other}")),
    }
}
