//! Postgres layer for the dataset builder: pool construction, embedded
//! schema migrations, and the row models and repositories the API crate
//! works through.

pub mod models;
pub mod repositories;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

/// Pool handle shared by request handlers and background cleanup tasks.
pub type DbPool = sqlx::PgPool;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect to Postgres at `database_url` and bring the schema up to date.
///
/// Migrations are embedded from `migrations/` at compile time and applied
/// before the pool is handed out, so callers never see a stale schema.
pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

/// True when a trivial query round-trips on the pool. Reported by the
/// health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
