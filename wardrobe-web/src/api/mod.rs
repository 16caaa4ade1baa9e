//! HTTP API handlers for wardrobe-web

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

pub mod auth;
pub mod buildinfo;
pub mod capsule;
pub mod closet;
pub mod health;
pub mod outfits;
pub mod profile;

pub use auth::{auth_middleware, CurrentUser};
pub use buildinfo::get_build_info;
pub use capsule::{generate_capsule, get_capsule};
pub use closet::{confirm_upload, discard_upload, get_closet, get_vocabulary, upload_photos};
pub use health::health_routes;
pub use outfits::{generate_outfits, list_outfits, swap_outfit, toggle_save, wear_outfit};
pub use profile::{get_home, get_profile, put_profile};

/// Result of a generation request
///
/// Generation that is not possible yet is not an error: the client is sent
/// back to the page where the precondition can be met.
#[derive(Debug)]
pub enum Generated<T> {
    Done(T),
    Redirect { to: &'static str, reason: String },
}

impl<T: Serialize> IntoResponse for Generated<T> {
    fn into_response(self) -> Response {
        match self {
            Generated::Done(body) => Json(body).into_response(),
            Generated::Redirect { to, reason } => (
                StatusCode::SEE_OTHER,
                [(LOCATION, to)],
                Json(json!({ "redirect": to, "reason": reason })),
            )
                .into_response(),
        }
    }
}
