//! Confirmed closet items

use sqlx::SqlitePool;
use uuid::Uuid;
use wardrobe_common::catalog::{Catalog, ClosetItem, Tags};
use wardrobe_common::{Error, Result};

use super::uploads::PendingUpload;

#[derive(sqlx::FromRow)]
struct ItemRow {
    guid: String,
    image_url: String,
    category: String,
    subcategory: String,
    color: String,
    silhouette: String,
    season: String,
}

impl TryFrom<ItemRow> for ClosetItem {
    type Error = wardrobe_common::Error;

    fn try_from(row: ItemRow) -> Result<Self> {
        Ok(ClosetItem {
            id: row.guid,
            image_url: row.image_url,
            category: row.category.parse()?,
            subcategory: row.subcategory,
            color: row.color,
            silhouette: row.silhouette,
            season: row.season,
        })
    }
}

/// The user's confirmed items in insertion order
pub async fn load_catalog(pool: &SqlitePool, user_id: &str) -> Result<Catalog> {
    let rows = sqlx::query_as::<_, ItemRow>(
        r#"
        SELECT guid, image_url, category, subcategory, color, silhouette, season
        FROM closet_items
        WHERE user_id = ?
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let items = rows
        .into_iter()
        .map(ClosetItem::try_from)
        .collect::<Result<Vec<_>>>()?;
    Ok(Catalog::new(items))
}

pub async fn count(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM closet_items WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Turn a pending upload into a closet item atomically
///
/// Fails with `NotFound` when the upload is no longer awaiting tags, so a
/// single upload yields at most one item.
pub async fn confirm_upload(
    pool: &SqlitePool,
    user_id: &str,
    upload: &PendingUpload,
    tags: Tags,
) -> Result<ClosetItem> {
    let mut tx = pool.begin().await?;

    let claimed = sqlx::query(
        "UPDATE uploads SET status = 'confirmed' WHERE guid = ? AND user_id = ? AND status = 'ready_to_tag'",
    )
    .bind(&upload.id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    if claimed.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Upload {}", upload.id)));
    }

    let item = ClosetItem::from_tags(Uuid::new_v4().to_string(), upload.image_url.clone(), tags);

    sqlx::query(
        r#"
        INSERT INTO closet_items
            (guid, user_id, image_url, category, subcategory, color, silhouette, season)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(user_id)
    .bind(&item.image_url)
    .bind(item.category.as_str())
    .bind(&item.subcategory)
    .bind(&item.color)
    .bind(&item.silhouette)
    .bind(&item.season)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{uploads, users};
    use tempfile::TempDir;
    use wardrobe_common::catalog::{Category, DEFAULT_SEASON};
    use wardrobe_common::db::init_database;

    fn tags() -> Tags {
        Tags {
            category: Category::Top,
            subcategory: "tee".to_string(),
            color: "black".to_string(),
            silhouette: "fitted".to_string(),
            season: DEFAULT_SEASON.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upload_confirms_only_once() {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("wardrobe.db")).await.unwrap();
        let (user, _) = users::create_user(&pool, "ada@example.com").await.unwrap();
        let upload = uploads::insert(&pool, &user.guid, "u/a.jpg", "/media/u/a.jpg")
            .await
            .unwrap();

        confirm_upload(&pool, &user.guid, &upload, tags()).await.unwrap();
        let err = confirm_upload(&pool, &user.guid, &upload, tags())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(count(&pool, &user.guid).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_upload_cannot_be_discarded() {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("wardrobe.db")).await.unwrap();
        let (user, _) = users::create_user(&pool, "ada@example.com").await.unwrap();
        let upload = uploads::insert(&pool, &user.guid, "u/a.jpg", "/media/u/a.jpg")
            .await
            .unwrap();

        confirm_upload(&pool, &user.guid, &upload, tags()).await.unwrap();

        assert!(!uploads::delete_pending(&pool, &user.guid, &upload.id).await.unwrap());
        assert_eq!(count(&pool, &user.guid).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_discarded_upload_cannot_be_confirmed() {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("wardrobe.db")).await.unwrap();
        let (user, _) = users::create_user(&pool, "ada@example.com").await.unwrap();
        let upload = uploads::insert(&pool, &user.guid, "u/a.jpg", "/media/u/a.jpg")
            .await
            .unwrap();

        assert!(uploads::delete_pending(&pool, &user.guid, &upload.id).await.unwrap());
        assert!(confirm_upload(&pool, &user.guid, &upload, tags()).await.is_err());
        assert_eq!(count(&pool, &user.guid).await.unwrap(), 0);
    }
}
