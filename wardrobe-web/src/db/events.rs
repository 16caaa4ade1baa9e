//! Append-only analytics log

use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;
use wardrobe_common::{AnalyticsEvent, Result};

async fn insert(pool: &SqlitePool, user_id: &str, event: &AnalyticsEvent) -> Result<()> {
    sqlx::query("INSERT INTO events (guid, user_id, type, entity_id, metadata) VALUES (?, ?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(event.event_type())
        .bind(event.entity_id())
        .bind(event.metadata().to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// Record an event; a failed write is logged and otherwise ignored
pub async fn record(pool: &SqlitePool, user_id: &str, event: &AnalyticsEvent) {
    if let Err(e) = insert(pool, user_id, event).await {
        warn!(
            event_type = event.event_type(),
            user_id, "Failed to record analytics event: {}", e
        );
    }
}

/// Event type strings for a user, oldest first
pub async fn list_types(pool: &SqlitePool, user_id: &str) -> Result<Vec<String>> {
    let types = sqlx::query_scalar("SELECT type FROM events WHERE user_id = ? ORDER BY rowid ASC")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(types)
}
