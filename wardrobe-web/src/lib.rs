//! wardrobe-web library - closet, capsule and outfit HTTP service
//!
//! Owns the HTTP surface, per-user persistence and photo storage. Styling
//! rules live in `wardrobe-common` and are called here with a catalog
//! snapshot loaded per request.

use axum::Router;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

pub mod api;
pub mod db;
pub mod error;
pub mod storage;
pub mod upload;

use storage::{ObjectStore, MEDIA_ROUTE};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub store: Arc<dyn ObjectStore>,
    /// Directory served under `/media`, if objects are kept locally
    pub media_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(db: SqlitePool, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            db,
            store,
            media_dir: None,
        }
    }

    pub fn with_media_dir(mut self, dir: PathBuf) -> Self {
        self.media_dir = Some(dir);
        self
    }
}

/// Build application router
///
/// Health and build info are public; everything else under `/api` goes
/// through the bearer token middleware.
pub fn build_router(state: AppState) -> Router {
    use axum::extract::DefaultBodyLimit;
    use axum::middleware;
    use axum::routing::{delete, get, post};

    let protected = Router::new()
        .route("/api/home", get(api::get_home))
        .route("/api/profile", get(api::get_profile).put(api::put_profile))
        .route("/api/closet", get(api::get_closet))
        .route("/api/closet/vocabulary", get(api::get_vocabulary))
        .route(
            "/api/closet/uploads",
            post(api::upload_photos).layer(DefaultBodyLimit::max(api::closet::UPLOAD_BODY_LIMIT)),
        )
        .route("/api/closet/uploads/:id", delete(api::discard_upload))
        .route("/api/closet/uploads/:id/confirm", post(api::confirm_upload))
        .route("/api/capsule", get(api::get_capsule).post(api::generate_capsule))
        .route("/api/outfits", get(api::list_outfits).post(api::generate_outfits))
        .route("/api/outfits/:id/save", post(api::toggle_save))
        .route("/api/outfits/:id/wear", post(api::wear_outfit))
        .route("/api/outfits/:id/swap", post(api::swap_outfit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    let mut router = Router::new().merge(protected).merge(public);
    if let Some(dir) = &state.media_dir {
        router = router.nest_service(MEDIA_ROUTE, ServeDir::new(dir));
    }

    router.with_state(state)
}
