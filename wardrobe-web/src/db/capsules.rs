//! Last generated capsule per user

use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use wardrobe_common::styling::{Capsule, GapSpec};
use wardrobe_common::Result;

/// Capsule as stored: item ids rather than full items
#[derive(Debug, Clone, Serialize)]
pub struct StoredCapsule {
    pub owned_item_ids: Vec<String>,
    pub gap_specs: Vec<GapSpec>,
    pub reasons: BTreeMap<String, String>,
    pub updated_at: String,
}

/// Replace the user's capsule with a freshly generated one
pub async fn upsert(pool: &SqlitePool, user_id: &str, capsule: &Capsule) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO capsules (user_id, owned_item_ids, gap_specs, reasons, updated_at)
        VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(user_id) DO UPDATE SET
            owned_item_ids = excluded.owned_item_ids,
            gap_specs = excluded.gap_specs,
            reasons = excluded.reasons,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(user_id)
    .bind(serde_json::to_string(&capsule.owned_item_ids())?)
    .bind(serde_json::to_string(&capsule.gaps)?)
    .bind(serde_json::to_string(&capsule.reasons())?)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &SqlitePool, user_id: &str) -> Result<Option<StoredCapsule>> {
    let row: Option<(String, String, String, String)> = sqlx::query_as(
        "SELECT owned_item_ids, gap_specs, reasons, updated_at FROM capsules WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some((owned, gaps, reasons, updated_at)) = row else {
        return Ok(None);
    };

    Ok(Some(StoredCapsule {
        owned_item_ids: serde_json::from_str(&owned)?,
        gap_specs: serde_json::from_str(&gaps)?,
        reasons: serde_json::from_str(&reasons)?,
        updated_at,
    }))
}
