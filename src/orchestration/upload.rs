// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Direct upload: request a slot, move the bytes, confirm the metadata.
//!
//! Confirmation is part of the upload. When it fails the transferred
//! object is deleted again and the upload fails with the confirmation
//! error.

use axum::body::Bytes;
use chrono::{DateTime, Utc};

use super::compensation::{inverse, CompensableSequence};
use crate::backend::{BackendClientSet, BackendError, TransferError, UploadRequest};
use crate::error::{ApiError, ErrorKind};
use crate::models::{file_extension, FileCategory, FileMeta};

/// Kind of record a file belongs to. Part of the storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Company,
    Vacancy,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Company => "company",
            EntityKind::Vacancy => "vacancy",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no file in request")]
    NoFile,
    #[error("file exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFile => ApiError::bad_request("NO_FILE", "No file provided"),
            UploadError::TooLarge { limit } => ApiError::bad_request(
                "FILE_TOO_LARGE",
                format!("File exceeds the {} MiB limit", limit / (1024 * 1024)),
            ),
            UploadError::Backend(e) => e.into(),
            UploadError::Transfer(e) => {
                tracing::warn!(error = %e, "Object transfer failed");
                ApiError::new(ErrorKind::Unavailable, "UPLOAD_FAILED", "File upload failed")
            }
        }
    }
}

/// A file received from a client, ready to be stored.
#[derive(Debug, Clone)]
pub struct DirectUpload {
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub category: FileCategory,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// `{kind}_{category}_{entity}_{unix}{.ext}`
pub fn storage_key(
    kind: EntityKind,
    category: FileCategory,
    entity_id: &str,
    file_name: &str,
    now: DateTime<Utc>,
) -> String {
    let ext = file_extension(file_name)
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!(
        "{}_{}_{}_{}{}",
        kind.as_str(),
        category,
        entity_id,
        now.timestamp(),
        ext
    )
}

/// Store `upload` and return its file key.
pub async fn upload_direct(
    backends: &BackendClientSet,
    upload: DirectUpload,
) -> Result<String, UploadError> {
    if upload.bytes.is_empty() {
        return Err(UploadError::NoFile);
    }
    let limit = upload.category.max_upload_bytes();
    if upload.bytes.len() > limit {
        return Err(UploadError::TooLarge { limit });
    }

    let now = Utc::now();
    let key = storage_key(
        upload.entity_kind,
        upload.category,
        &upload.entity_id,
        &upload.file_name,
        now,
    );
    let file_size = upload.bytes.len() as u64;

    let ticket = backends
        .files
        .upload_url(&UploadRequest {
            user_uuid: upload.entity_id.clone(),
            achievement_name: key.clone(),
            file_name: upload.file_name.clone(),
            file_type: upload.content_type.clone(),
            file_size,
        })
        .await?;

    let mut seq = CompensableSequence::new("direct_upload");
    let files = backends.files.clone();

    seq.step(
        "transfer",
        backends
            .uploader
            .put(&ticket.upload_url, &upload.content_type, upload.bytes),
        |_| {
            let entity_id = upload.entity_id.clone();
            let key = key.clone();
            inverse(move || async move { files.delete_file(&entity_id, &key).await })
        },
    )
    .await?;

    let meta = FileMeta {
        name: key.clone(),
        user_uuid: upload.entity_id.clone(),
        file_name: upload.file_name,
        file_type: upload.content_type,
        file_size,
        created_at: now.to_rfc3339(),
    };
    seq.step(
        "confirm",
        backends.files.confirm(&meta, &ticket.s3_key),
        |_| None,
    )
    .await?;

    tracing::info!(
        entity = upload.entity_kind.as_str(),
        entity_id = %upload.entity_id,
        category = %upload.category,
        key = %key,
        size = file_size,
        "File uploaded"
    );
    Ok(key)
}
