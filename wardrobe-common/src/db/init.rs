//! Database initialization
//!
//! Creates the database on first run and applies the schema. Every
//! `CREATE` is idempotent, so opening an existing database is safe.
//!
//! Tables, all keyed by `user_id` except `users` itself:
//! - `users`: account, bearer token hash and style profile
//! - `uploads`: stored photos waiting for tags
//! - `closet_items`: confirmed, tagged items
//! - `capsules`: latest capsule per user (upserted)
//! - `outfits`: generated looks with saved/worn flags
//! - `events`: append-only analytics log

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::Result;

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Open (creating if needed) the database and apply the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // foreign_keys and busy_timeout are per-connection, so they go on the
    // connect options rather than a one-off PRAGMA
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Apply all table definitions (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_users_table(pool).await?;
    create_uploads_table(pool).await?;
    create_closet_items_table(pool).await?;
    create_capsules_table(pool).await?;
    create_outfits_table(pool).await?;
    create_events_table(pool).await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            guid TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            token_hash TEXT NOT NULL UNIQUE,
            sizes TEXT NOT NULL DEFAULT '{}',
            budget_band TEXT NOT NULL DEFAULT '',
            vibes TEXT NOT NULL DEFAULT '[]',
            climate TEXT NOT NULL DEFAULT 'temperate',
            brands TEXT NOT NULL DEFAULT '[]',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_uploads_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS uploads (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            object_path TEXT NOT NULL,
            image_url TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'ready_to_tag'
                CHECK (status IN ('ready_to_tag', 'confirmed')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_uploads_user ON uploads(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_closet_items_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS closet_items (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            image_url TEXT NOT NULL,
            category TEXT NOT NULL
                CHECK (category IN ('top', 'bottom', 'dress', 'outerwear', 'shoes', 'bag', 'accessory')),
            subcategory TEXT NOT NULL DEFAULT '',
            color TEXT NOT NULL,
            silhouette TEXT NOT NULL,
            season TEXT NOT NULL DEFAULT 'all-season',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_closet_items_user ON closet_items(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_capsules_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS capsules (
            user_id TEXT PRIMARY KEY REFERENCES users(guid) ON DELETE CASCADE,
            owned_item_ids TEXT NOT NULL DEFAULT '[]',
            gap_specs TEXT NOT NULL DEFAULT '[]',
            reasons TEXT NOT NULL DEFAULT '{}',
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_outfits_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS outfits (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            item_ids TEXT NOT NULL,
            occasion TEXT NOT NULL CHECK (occasion IN ('evening', 'work', 'casual')),
            score INTEGER NOT NULL CHECK (score >= 0),
            saved INTEGER NOT NULL DEFAULT 0,
            worn INTEGER NOT NULL DEFAULT 0,
            metadata TEXT NOT NULL DEFAULT '{}',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_outfits_user ON outfits(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            guid TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            type TEXT NOT NULL,
            entity_id TEXT,
            metadata TEXT NOT NULL DEFAULT '{}',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_user ON events(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}
