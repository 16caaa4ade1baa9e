//! Persisted looks
//!
//! Rows keep item ids only. Reads rebuild each outfit against the user's
//! current catalog; ids that no longer resolve are dropped from the look.

use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;
use wardrobe_common::catalog::{Catalog, ClosetItem};
use wardrobe_common::styling::{Outfit, OutfitMetadata};
use wardrobe_common::{Error, Result};

#[derive(sqlx::FromRow)]
struct OutfitRow {
    guid: String,
    item_ids: String,
    occasion: String,
    score: i64,
    saved: bool,
    worn: bool,
    metadata: String,
}

fn outfit_from_row(row: OutfitRow, by_id: &HashMap<&str, &ClosetItem>) -> Result<Outfit> {
    let item_ids: Vec<String> = serde_json::from_str(&row.item_ids)?;
    let metadata: OutfitMetadata = serde_json::from_str(&row.metadata)?;
    let score = u32::try_from(row.score)
        .map_err(|_| Error::Internal(format!("Negative score on outfit {}", row.guid)))?;

    Ok(Outfit {
        items: item_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).map(|item| (*item).clone()))
            .collect(),
        id: row.guid,
        occasion: row.occasion.parse()?,
        score,
        saved: row.saved,
        worn: row.worn,
        metadata,
    })
}

fn index(catalog: &Catalog) -> HashMap<&str, &ClosetItem> {
    catalog.items().iter().map(|i| (i.id.as_str(), i)).collect()
}

/// Store one generated outfit and return its permanent id
pub async fn insert(pool: &SqlitePool, user_id: &str, outfit: &Outfit) -> Result<String> {
    let guid = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO outfits (guid, user_id, item_ids, occasion, score, saved, worn, metadata)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guid)
    .bind(user_id)
    .bind(serde_json::to_string(&outfit.item_ids())?)
    .bind(outfit.occasion.as_str())
    .bind(i64::from(outfit.score))
    .bind(outfit.saved)
    .bind(outfit.worn)
    .bind(serde_json::to_string(&outfit.metadata)?)
    .execute(pool)
    .await?;
    Ok(guid)
}

const OUTFIT_COLUMNS: &str = "guid, item_ids, occasion, score, saved, worn, metadata";

/// Newest generation first, rank order within a generation
pub async fn list(pool: &SqlitePool, user_id: &str, catalog: &Catalog) -> Result<Vec<Outfit>> {
    let rows = sqlx::query_as::<_, OutfitRow>(&format!(
        "SELECT {} FROM outfits WHERE user_id = ? ORDER BY created_at DESC, rowid ASC",
        OUTFIT_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let by_id = index(catalog);
    rows.into_iter()
        .map(|row| outfit_from_row(row, &by_id))
        .collect()
}

pub async fn get(
    pool: &SqlitePool,
    user_id: &str,
    outfit_id: &str,
    catalog: &Catalog,
) -> Result<Option<Outfit>> {
    let row = sqlx::query_as::<_, OutfitRow>(&format!(
        "SELECT {} FROM outfits WHERE user_id = ? AND guid = ?",
        OUTFIT_COLUMNS
    ))
    .bind(user_id)
    .bind(outfit_id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| outfit_from_row(row, &index(catalog)))
        .transpose()
}

/// Write back the mutable flags of an outfit
pub async fn update_flags(pool: &SqlitePool, user_id: &str, outfit: &Outfit) -> Result<()> {
    let result = sqlx::query("UPDATE outfits SET saved = ?, worn = ? WHERE user_id = ? AND guid = ?")
        .bind(outfit.saved)
        .bind(outfit.worn)
        .bind(user_id)
        .bind(&outfit.id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Outfit {}", outfit.id)));
    }
    Ok(())
}
