//! Outfit generation and per-look actions

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use tracing::{info, warn};
use wardrobe_common::catalog::MIN_OUTFIT_ITEMS;
use wardrobe_common::styling::{self, Outfit};
use wardrobe_common::AnalyticsEvent;

use super::{CurrentUser, Generated};
use crate::db::{closet_items, events, outfits};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// An outfit with its caption
#[derive(Debug, Serialize)]
pub struct OutfitView {
    #[serde(flatten)]
    pub outfit: Outfit,
    pub description: String,
}

impl From<Outfit> for OutfitView {
    fn from(outfit: Outfit) -> Self {
        Self {
            description: outfit.description(),
            outfit,
        }
    }
}

fn views(outfits: Vec<Outfit>) -> Vec<OutfitView> {
    outfits.into_iter().map(OutfitView::from).collect()
}

async fn load_outfit(state: &AppState, user_id: &str, outfit_id: &str) -> ApiResult<Outfit> {
    let catalog = closet_items::load_catalog(&state.db, user_id).await?;
    outfits::get(&state.db, user_id, outfit_id, &catalog)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Outfit {}", outfit_id)))
}

/// POST /api/outfits
///
/// Each outfit is written on its own. One that cannot be stored is logged
/// and still returned, keeping its generated id.
pub async fn generate_outfits(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Generated<Vec<OutfitView>>> {
    let catalog = closet_items::load_catalog(&state.db, &user.guid).await?;
    if !catalog.can_generate_outfits() {
        return Ok(Generated::Redirect {
            to: "/closet",
            reason: format!(
                "Add at least {} items to generate outfits ({} so far)",
                MIN_OUTFIT_ITEMS,
                catalog.len()
            ),
        });
    }

    let mut generated = styling::generate_outfits(&catalog);
    for outfit in generated.iter_mut() {
        match outfits::insert(&state.db, &user.guid, outfit).await {
            Ok(guid) => outfit.id = guid,
            Err(e) => warn!(user_id = %user.guid, outfit_id = %outfit.id, "Failed to persist outfit: {}", e),
        }
    }

    events::record(
        &state.db,
        &user.guid,
        &AnalyticsEvent::GenerateOutfits {
            total_outfits: generated.len(),
            total_items: catalog.len(),
        },
    )
    .await;

    info!(user_id = %user.guid, outfits = generated.len(), "Outfits generated");
    Ok(Generated::Done(views(generated)))
}

/// GET /api/outfits
pub async fn list_outfits(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<OutfitView>>> {
    let catalog = closet_items::load_catalog(&state.db, &user.guid).await?;
    let stored = outfits::list(&state.db, &user.guid, &catalog).await?;
    Ok(Json(views(stored)))
}

/// POST /api/outfits/:id/save
pub async fn toggle_save(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(outfit_id): Path<String>,
) -> ApiResult<Json<OutfitView>> {
    let mut outfit = load_outfit(&state, &user.guid, &outfit_id).await?;

    outfit.toggle_saved();
    outfits::update_flags(&state.db, &user.guid, &outfit).await?;

    events::record(&state.db, &user.guid, &AnalyticsEvent::save_look(&outfit.id)).await;

    Ok(Json(outfit.into()))
}

/// POST /api/outfits/:id/wear
///
/// Wearing an outfit twice changes nothing and records nothing.
pub async fn wear_outfit(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(outfit_id): Path<String>,
) -> ApiResult<Json<OutfitView>> {
    let mut outfit = load_outfit(&state, &user.guid, &outfit_id).await?;

    if outfit.mark_worn() {
        outfits::update_flags(&state.db, &user.guid, &outfit).await?;
        events::record(
            &state.db,
            &user.guid,
            &AnalyticsEvent::Wear {
                outfit_id: outfit.id.clone(),
                occasion: outfit.occasion,
            },
        )
        .await;
    }

    Ok(Json(outfit.into()))
}

/// POST /api/outfits/:id/swap
///
/// The request is recorded, then refused.
pub async fn swap_outfit(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(outfit_id): Path<String>,
) -> ApiResult<Json<OutfitView>> {
    let outfit = load_outfit(&state, &user.guid, &outfit_id).await?;

    events::record(
        &state.db,
        &user.guid,
        &AnalyticsEvent::Swap {
            outfit_id: outfit.id,
        },
    )
    .await;

    Err(ApiError::NotImplemented("Swap feature coming soon".to_string()))
}
