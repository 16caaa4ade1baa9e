//! Photo upload pipeline
//!
//! Files are filtered to image content types, capped at the closet's
//! remaining capacity and then stored one at a time in submission order.
//! A failure on one file is reported against that file only.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{object_path, ObjectStore};

/// One file as submitted by the client
#[derive(Debug, Clone, Deserialize)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    /// File contents, standard base64
    pub data_base64: String,
}

impl UploadFile {
    fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Result for a single stored (or failed) file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    ReadyToTag {
        file_name: String,
        #[serde(skip)]
        object_path: String,
        image_url: String,
    },
    Error {
        file_name: String,
        message: String,
    },
}

impl UploadOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            UploadOutcome::ReadyToTag { file_name, .. } | UploadOutcome::Error { file_name, .. } => {
                file_name
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, UploadOutcome::ReadyToTag { .. })
    }
}

/// Everything that happened to one submission
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadBatch {
    pub outcomes: Vec<UploadOutcome>,
    /// Files dropped for a non-image content type
    pub skipped_non_image: usize,
    /// Image files dropped because the closet would overflow
    pub skipped_over_capacity: usize,
}

async fn store_one(store: &dyn ObjectStore, user_id: &str, file: &UploadFile) -> UploadOutcome {
    let bytes = match BASE64.decode(file.data_base64.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            return UploadOutcome::Error {
                file_name: file.file_name.clone(),
                message: format!("Invalid file data: {}", e),
            }
        }
    };

    let path = object_path(user_id, &file.file_name);
    match store.upload(&path, &bytes, &file.content_type).await {
        Ok(()) => UploadOutcome::ReadyToTag {
            file_name: file.file_name.clone(),
            image_url: store.public_url(&path),
            object_path: path,
        },
        Err(e) => {
            warn!(user_id, file = %file.file_name, "Upload failed: {}", e);
            UploadOutcome::Error {
                file_name: file.file_name.clone(),
                message: e.to_string(),
            }
        }
    }
}

/// Store a batch of files for `user_id`
pub async fn process_uploads(
    store: &dyn ObjectStore,
    user_id: &str,
    files: Vec<UploadFile>,
    remaining_capacity: usize,
) -> UploadBatch {
    let total = files.len();
    let mut images: Vec<UploadFile> = files.into_iter().filter(UploadFile::is_image).collect();
    let skipped_non_image = total - images.len();

    let skipped_over_capacity = images.len().saturating_sub(remaining_capacity);
    images.truncate(remaining_capacity);

    let mut outcomes = Vec::with_capacity(images.len());
    for file in &images {
        outcomes.push(store_one(store, user_id, file).await);
    }

    debug!(
        user_id,
        stored = outcomes.iter().filter(|o| o.is_ready()).count(),
        skipped_non_image,
        skipped_over_capacity,
        "Processed upload batch"
    );

    UploadBatch {
        outcomes,
        skipped_non_image,
        skipped_over_capacity,
    }
}
