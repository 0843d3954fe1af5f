// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Direct file serving and the multipart plumbing shared by upload routes.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{ApiError, ErrorBody, ErrorKind},
    models::{FileCategory, FileUploadResponse},
    orchestration::{upload_direct, DirectUpload, EntityKind},
    state::AppState,
};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One file taken from a multipart body.
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Read the part named `field_name`. Other parts are skipped.
pub async fn read_file(
    multipart: Result<Multipart, MultipartRejection>,
    field_name: &str,
) -> Result<ReceivedFile, ApiError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(field_name)
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await?;
        return Ok(ReceivedFile {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(ApiError::bad_request(
        "NO_FILE",
        format!("No {field_name} file provided"),
    ))
}

/// A file that reached storage and was confirmed.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub key: String,
    pub content_type: String,
}

/// Upload `file` for an entity.
pub async fn store_file(
    state: &AppState,
    entity_kind: EntityKind,
    entity_id: &str,
    category: FileCategory,
    file: ReceivedFile,
) -> Result<StoredFile, ApiError> {
    let content_type = file.content_type.clone();
    let key = upload_direct(
        &state.backends,
        DirectUpload {
            entity_kind,
            entity_id: entity_id.to_string(),
            category,
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
        },
    )
    .await?;
    Ok(StoredFile { key, content_type })
}

/// Describe a freshly stored file. The file is already stored and linked,
/// so a failed link lookup only leaves `url` empty.
pub async fn upload_response(
    state: &AppState,
    entity_id: &str,
    stored: &StoredFile,
    category: FileCategory,
    message: &str,
) -> Json<FileUploadResponse> {
    let file_info = state
        .enricher
        .describe_stored(entity_id, &stored.key, category, &stored.content_type)
        .await;
    Json(FileUploadResponse {
        file_info,
        message: message.to_string(),
    })
}

/// Delete a stored file. An object that is already gone counts as deleted.
pub async fn remove_file(state: &AppState, entity_id: &str, file_id: &str) -> Result<(), ApiError> {
    if file_id.is_empty() {
        return Err(ApiError::bad_request("NO_FILE", "No file attached"));
    }
    match state.backends.files.delete_file(entity_id, file_id).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Redirect to a fresh presigned URL for a stored file.
#[utoipa::path(
    get,
    path = "/api/v1/files/{entity_id}/{file_name}",
    tag = "Files",
    security(("bearer_auth" = [])),
    params(
        ("entity_id" = String, Path, description = "Owning user, company or vacancy"),
        ("file_name" = String, Path, description = "Stored file key")
    ),
    responses(
        (status = 302, description = "Redirect to the file"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn serve_file(
    State(state): State<AppState>,
    Path((entity_id, file_name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let link = state
        .backends
        .files
        .download_url(&entity_id, &file_name)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                ApiError::new(ErrorKind::NotFound, "FILE_NOT_FOUND", "File not found")
            } else {
                e.into()
            }
        })?;

    Ok((StatusCode::FOUND, [(LOCATION, link.url)]).into_response())
}
