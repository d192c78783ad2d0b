// ABOUTME: Data layer and persistence for Banter
// ABOUTME: SQLite pool management and pricing storage

pub mod model_pricing;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

pub use model_pricing::{ModelPricing, ModelPricingStorage, ModelPricingUpsert};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Create a SQLite pool, apply connection pragmas, and run migrations
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    debug!("Storage pool initialized: {}", database_url);

    Ok(pool)
}
