//! Capsule generation

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};
use wardrobe_common::catalog::{ClosetItem, MIN_CAPSULE_ITEMS};
use wardrobe_common::styling::{self, GapSpec};
use wardrobe_common::AnalyticsEvent;

use super::{CurrentUser, Generated};
use crate::db::capsules::{self, StoredCapsule};
use crate::db::{closet_items, events};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CapsuleResponse {
    pub selected: Vec<ClosetItem>,
    pub gaps: Vec<GapSpec>,
    pub reasons: BTreeMap<String, String>,
}

/// POST /api/capsule
///
/// Fewer than [`MIN_CAPSULE_ITEMS`] confirmed items sends the client back
/// to the closet. The capsule is returned even if persisting it fails.
pub async fn generate_capsule(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Generated<CapsuleResponse>> {
    let catalog = closet_items::load_catalog(&state.db, &user.guid).await?;
    if !catalog.can_generate_capsule() {
        return Ok(Generated::Redirect {
            to: "/closet",
            reason: format!(
                "Add at least {} items to build a capsule ({} so far)",
                MIN_CAPSULE_ITEMS,
                catalog.len()
            ),
        });
    }

    let capsule = styling::generate_capsule(&catalog);

    if let Err(e) = capsules::upsert(&state.db, &user.guid, &capsule).await {
        warn!(user_id = %user.guid, "Failed to persist capsule: {}", e);
    }

    events::record(
        &state.db,
        &user.guid,
        &AnalyticsEvent::GenerateCapsule {
            total_items: catalog.len(),
            selected_items: capsule.selected.len(),
            gaps_count: capsule.gaps.len(),
        },
    )
    .await;

    info!(
        user_id = %user.guid,
        items = capsule.selected.len(),
        gaps = capsule.gaps.len(),
        "Capsule generated"
    );

    let reasons = capsule.reasons();
    Ok(Generated::Done(CapsuleResponse {
        selected: capsule.selected,
        gaps: capsule.gaps,
        reasons,
    }))
}

/// GET /api/capsule
pub async fn get_capsule(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<StoredCapsule>> {
    capsules::get(&state.db, &user.guid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No capsule generated yet".to_string()))
}
