//! Closet page: items, uploads awaiting tags and tag confirmation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};
use wardrobe_common::catalog::{
    Category, ClosetItem, TagDraft, COLORS, DEFAULT_SEASON, MAX_CLOSET_ITEMS, MIN_CAPSULE_ITEMS,
    SILHOUETTES,
};
use wardrobe_common::AnalyticsEvent;

use super::CurrentUser;
use crate::db::uploads::{self, PendingUpload};
use crate::db::{closet_items, events};
use crate::error::{ApiError, ApiResult};
use crate::upload::{process_uploads, UploadFile, UploadOutcome};
use crate::AppState;

/// Free slots left: the cap minus confirmed items and pending uploads
async fn remaining_capacity(state: &AppState, user_id: &str) -> ApiResult<usize> {
    let confirmed = closet_items::count(&state.db, user_id).await?;
    let pending = uploads::count_pending(&state.db, user_id).await?;
    let used = usize::try_from(confirmed + pending).unwrap_or(usize::MAX);
    Ok(MAX_CLOSET_ITEMS.saturating_sub(used))
}

#[derive(Debug, Serialize)]
pub struct ClosetResponse {
    pub items: Vec<ClosetItem>,
    pub pending_uploads: Vec<PendingUpload>,
    pub category_counts: BTreeMap<Category, usize>,
    pub total_items: usize,
    pub remaining_capacity: usize,
    /// Enough confirmed items to build a capsule
    pub can_proceed: bool,
}

/// GET /api/closet
pub async fn get_closet(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<ClosetResponse>> {
    let catalog = closet_items::load_catalog(&state.db, &user.guid).await?;
    let pending_uploads = uploads::list_pending(&state.db, &user.guid).await?;

    let total_items = catalog.len();
    let remaining = MAX_CLOSET_ITEMS.saturating_sub(total_items + pending_uploads.len());

    Ok(Json(ClosetResponse {
        category_counts: catalog.category_counts(),
        can_proceed: total_items >= MIN_CAPSULE_ITEMS,
        items: catalog.into_items(),
        pending_uploads,
        total_items,
        remaining_capacity: remaining,
    }))
}

#[derive(Debug, Serialize)]
pub struct CategoryVocabulary {
    pub category: Category,
    pub subcategories: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct Vocabulary {
    pub categories: Vec<CategoryVocabulary>,
    pub colors: &'static [&'static str],
    pub silhouettes: &'static [&'static str],
    pub default_season: &'static str,
}

/// GET /api/closet/vocabulary
pub async fn get_vocabulary() -> Json<Vocabulary> {
    Json(Vocabulary {
        categories: Category::PRIORITY
            .iter()
            .map(|&category| CategoryVocabulary {
                category,
                subcategories: category.subcategories(),
            })
            .collect(),
        colors: COLORS,
        silhouettes: SILHOUETTES,
        default_season: DEFAULT_SEASON,
    })
}

/// Request body cap for photo uploads (base64 inflates by a third)
pub const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
}

/// Per-file result returned to the client
#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub file_name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResult {
    fn ready(file_name: String, upload: PendingUpload) -> Self {
        Self {
            file_name,
            status: "ready_to_tag",
            upload_id: Some(upload.id),
            image_url: Some(upload.image_url),
            message: None,
        }
    }

    fn error(file_name: String, message: String) -> Self {
        Self {
            file_name,
            status: "error",
            upload_id: None,
            image_url: None,
            message: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub results: Vec<UploadResult>,
    pub skipped_non_image: usize,
    pub skipped_over_capacity: usize,
    pub remaining_capacity: usize,
}

/// POST /api/closet/uploads
///
/// Stored files are recorded as uploads awaiting tags. A file whose record
/// cannot be written is reported as an error and its object removed.
pub async fn upload_photos(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<UploadRequest>,
) -> ApiResult<Json<UploadResponse>> {
    let capacity = remaining_capacity(&state, &user.guid).await?;
    if capacity == 0 {
        return Err(ApiError::Conflict(format!(
            "Closet is full ({} items)",
            MAX_CLOSET_ITEMS
        )));
    }

    let batch = process_uploads(state.store.as_ref(), &user.guid, request.files, capacity).await;

    let mut results = Vec::with_capacity(batch.outcomes.len());
    for outcome in batch.outcomes {
        match outcome {
            UploadOutcome::ReadyToTag {
                file_name,
                object_path,
                image_url,
            } => match uploads::insert(&state.db, &user.guid, &object_path, &image_url).await {
                Ok(upload) => results.push(UploadResult::ready(file_name, upload)),
                Err(e) => {
                    warn!(user_id = %user.guid, "Failed to record upload {}: {}", object_path, e);
                    if let Err(e) = state.store.delete(&object_path).await {
                        warn!("Failed to remove orphaned object {}: {}", object_path, e);
                    }
                    results.push(UploadResult::error(file_name, e.to_string()));
                }
            },
            UploadOutcome::Error { file_name, message } => {
                results.push(UploadResult::error(file_name, message))
            }
        }
    }

    let stored = results.iter().filter(|r| r.upload_id.is_some()).count();
    info!(user_id = %user.guid, stored, "Uploads ready to tag");

    Ok(Json(UploadResponse {
        results,
        skipped_non_image: batch.skipped_non_image,
        skipped_over_capacity: batch.skipped_over_capacity,
        remaining_capacity: capacity.saturating_sub(stored),
    }))
}

/// DELETE /api/closet/uploads/:id
pub async fn discard_upload(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(upload_id): Path<String>,
) -> ApiResult<StatusCode> {
    let upload = uploads::find_pending(&state.db, &user.guid, &upload_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Upload {}", upload_id)))?;

    // A concurrent confirm may have claimed the upload since the lookup
    if !uploads::delete_pending(&state.db, &user.guid, &upload.id).await? {
        return Err(ApiError::NotFound(format!("Upload {}", upload_id)));
    }

    if let Err(e) = state.store.delete(&upload.object_path).await {
        warn!("Failed to remove object {}: {}", upload.object_path, e);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/closet/uploads/:id/confirm
pub async fn confirm_upload(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(upload_id): Path<String>,
    Json(draft): Json<TagDraft>,
) -> ApiResult<Json<ClosetItem>> {
    let upload = uploads::find_pending(&state.db, &user.guid, &upload_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Upload {}", upload_id)))?;

    let tags = draft.validate()?;
    let item = closet_items::confirm_upload(&state.db, &user.guid, &upload, tags).await?;

    events::record(
        &state.db,
        &user.guid,
        &AnalyticsEvent::ConfirmTag {
            category: item.category,
            color: item.color.clone(),
            silhouette: item.silhouette.clone(),
        },
    )
    .await;

    info!(user_id = %user.guid, item_id = %item.id, category = %item.category, "Item confirmed");
    Ok(Json(item))
}
