//! Store and credential wiring, built once at startup and shared by every
//! request.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use filmapi_auth::Hs256JwtCodec;
use filmapi_core::{Director, Movie};
use filmapi_infra::{InMemoryRecordStore, InMemoryUserStore, PostgresStore, RecordStore, UserStore};

use crate::config::{AppConfig, DatabaseConfig};

/// Everything a handler needs, injected as an axum `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub movies: Arc<dyn RecordStore<Movie>>,
    pub directors: Arc<dyn RecordStore<Director>>,
    pub users: Arc<dyn UserStore>,
    pub jwt: Arc<Hs256JwtCodec>,
}

impl AppServices {
    /// In-memory stores (dev/test).
    pub fn in_memory(jwt: Hs256JwtCodec) -> Self {
        Self {
            movies: Arc::new(InMemoryRecordStore::<Movie>::new()),
            directors: Arc::new(InMemoryRecordStore::<Director>::new()),
            users: Arc::new(InMemoryUserStore::new()),
            jwt: Arc::new(jwt),
        }
    }

    /// One Postgres pool shared by every record type.
    pub fn postgres(store: PostgresStore, jwt: Hs256JwtCodec) -> Self {
        let store = Arc::new(store);
        Self {
            movies: store.clone(),
            directors: store.clone(),
            users: store,
            jwt: Arc::new(jwt),
        }
    }
}

/// Build services from configuration: Postgres when `DATABASE_URL` is set,
/// otherwise in-memory.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let jwt = Hs256JwtCodec::new(config.jwt_secret.as_bytes(), config.token_ttl);

    match &config.database {
        Some(db) => {
            let store = connect_postgres(db).await?;
            tracing::info!(store = "postgres", "record store ready");
            Ok(AppServices::postgres(store, jwt))
        }
        None => {
            tracing::warn!(store = "in-memory", "DATABASE_URL not set; data will not survive a restart");
            Ok(AppServices::in_memory(jwt))
        }
    }
}

async fn connect_postgres(db: &DatabaseConfig) -> anyhow::Result<PostgresStore> {
    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(db.acquire_timeout)
        .connect(&db.url)
        .await
        .context("failed to connect to Postgres")?;

    let store = PostgresStore::new(pool);
    store.migrate().await.context("failed to create tables")?;
    Ok(store)
}
