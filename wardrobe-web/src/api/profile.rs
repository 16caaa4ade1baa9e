//! Home routing and onboarding profile

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use tracing::info;
use wardrobe_common::profile::{NextStep, StyleProfile};
use wardrobe_common::AnalyticsEvent;

use super::CurrentUser;
use crate::db::{events, users};
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub user_id: String,
    pub email: String,
    pub next_step: NextStep,
    pub redirect: &'static str,
}

/// GET /api/home
///
/// Users with a complete profile go to the closet, everyone else to
/// onboarding.
pub async fn get_home(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<HomeResponse> {
    let next_step = user.profile.next_step();
    Json(HomeResponse {
        user_id: user.guid,
        email: user.email,
        next_step,
        redirect: next_step.path(),
    })
}

/// GET /api/profile
pub async fn get_profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<StyleProfile> {
    Json(user.profile)
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: StyleProfile,
    pub next_step: NextStep,
    pub redirect: &'static str,
}

/// PUT /api/profile
pub async fn put_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(profile): Json<StyleProfile>,
) -> ApiResult<Json<ProfileResponse>> {
    profile.validate()?;
    users::update_profile(&state.db, &user.guid, &profile).await?;

    events::record(
        &state.db,
        &user.guid,
        &AnalyticsEvent::CompleteOnboarding {
            budget_band: profile.budget_band.clone(),
            vibes: profile.vibes.clone(),
            climate: profile.climate.clone(),
        },
    )
    .await;

    info!(user_id = %user.guid, "Onboarding profile saved");

    let next_step = profile.next_step();
    Ok(Json(ProfileResponse {
        profile,
        next_step,
        redirect: next_step.path(),
    }))
}
