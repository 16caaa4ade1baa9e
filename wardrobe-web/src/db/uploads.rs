//! Stored photos waiting for tags

use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;
use wardrobe_common::Result;

/// Upload that reached storage and can be tagged
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PendingUpload {
    #[sqlx(rename = "guid")]
    pub id: String,
    #[serde(skip)]
    pub object_path: String,
    pub image_url: String,
}

pub async fn insert(
    pool: &SqlitePool,
    user_id: &str,
    object_path: &str,
    image_url: &str,
) -> Result<PendingUpload> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO uploads (guid, user_id, object_path, image_url, status) VALUES (?, ?, ?, ?, 'ready_to_tag')",
    )
    .bind(&id)
    .bind(user_id)
    .bind(object_path)
    .bind(image_url)
    .execute(pool)
    .await?;

    Ok(PendingUpload {
        id,
        object_path: object_path.to_string(),
        image_url: image_url.to_string(),
    })
}

/// Uploads still awaiting tags, oldest first
pub async fn list_pending(pool: &SqlitePool, user_id: &str) -> Result<Vec<PendingUpload>> {
    let rows = sqlx::query_as::<_, PendingUpload>(
        r#"
        SELECT guid, object_path, image_url FROM uploads
        WHERE user_id = ? AND status = 'ready_to_tag'
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_pending(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM uploads WHERE user_id = ? AND status = 'ready_to_tag'",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn find_pending(
    pool: &SqlitePool,
    user_id: &str,
    upload_id: &str,
) -> Result<Option<PendingUpload>> {
    let row = sqlx::query_as::<_, PendingUpload>(
        "SELECT guid, object_path, image_url FROM uploads WHERE user_id = ? AND guid = ? AND status = 'ready_to_tag'",
    )
    .bind(user_id)
    .bind(upload_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Discard a pending upload; returns false if nothing matched
pub async fn delete_pending(pool: &SqlitePool, user_id: &str, upload_id: &str) -> Result<bool> {
    let result = sqlx::query(
        "DELETE FROM uploads WHERE user_id = ? AND guid = ? AND status = 'ready_to_tag'",
    )
    .bind(user_id)
    .bind(upload_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
