// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Achievement endpoints.
//!
//! Achievements are uploaded by the client directly to storage: the
//! gateway hands out an upload slot, the client PUTs the bytes and then
//! confirms. The `{id}` segment is the achievement name; achievements are
//! always those of the caller.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;

use crate::{
    auth::Auth,
    backend::UploadRequest,
    error::{ApiError, ErrorBody},
    models::{
        AchievementUploadRequest, AchievementUploadResponse, ConfirmUploadRequest, DownloadUrl,
        FileMeta, FileMetaList, MessageResponse,
    },
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/user/achievements",
    tag = "Achievements",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's achievements", body = FileMetaList),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn list_achievements(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<FileMetaList>, ApiError> {
    let achievements = state.backends.files.list_files(&actor.id).await?;
    Ok(Json(FileMetaList { achievements }))
}

/// Reserve an upload slot for a new achievement.
#[utoipa::path(
    post,
    path = "/api/v1/user/achievements",
    tag = "Achievements",
    security(("bearer_auth" = [])),
    request_body = AchievementUploadRequest,
    responses(
        (status = 200, description = "Upload slot and metadata to confirm", body = AchievementUploadResponse),
        (status = 400, description = "Missing fields", body = ErrorBody)
    )
)]
pub async fn create_achievement(
    Auth(actor): Auth,
    State(state): State<AppState>,
    payload: Result<Json<AchievementUploadRequest>, JsonRejection>,
) -> Result<Json<AchievementUploadResponse>, ApiError> {
    let Json(request) = payload?;
    if let Some(field) = request.missing_field() {
        return Err(ApiError::bad_request(
            "MISSING_FIELDS",
            format!("Field `{field}` is required"),
        ));
    }

    let upload = state
        .backends
        .files
        .upload_url(&UploadRequest {
            user_uuid: actor.id.clone(),
            achievement_name: request.name.clone(),
            file_name: request.file_name.clone(),
            file_type: request.file_type.clone(),
            file_size: request.file_size,
        })
        .await?;

    let meta = FileMeta {
        name: request.name,
        user_uuid: actor.id,
        file_name: request.file_name,
        file_type: request.file_type,
        file_size: request.file_size,
        created_at: Utc::now().to_rfc3339(),
    };
    Ok(Json(AchievementUploadResponse { meta, upload }))
}

/// Record metadata once the client has uploaded the bytes.
#[utoipa::path(
    post,
    path = "/api/v1/user/achievements/{id}/confirm",
    tag = "Achievements",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Achievement name")),
    request_body = ConfirmUploadRequest,
    responses(
        (status = 200, description = "Confirmed", body = MessageResponse),
        (status = 400, description = "Missing storage key", body = ErrorBody)
    )
)]
pub async fn confirm_achievement(
    Auth(actor): Auth,
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<ConfirmUploadRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    if request.s3_key.trim().is_empty() {
        return Err(ApiError::bad_request("MISSING_FIELDS", "s3_key is required"));
    }

    // The path and the caller decide whose achievement this is.
    let meta = FileMeta {
        name,
        user_uuid: actor.id,
        ..request.meta
    };
    state.backends.files.confirm(&meta, &request.s3_key).await?;

    tracing::info!(user_id = %meta.user_uuid, achievement = %meta.name, "Achievement confirmed");
    Ok(Json(MessageResponse::new("Achievement upload confirmed")))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/achievements/{id}/download",
    tag = "Achievements",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Achievement name")),
    responses(
        (status = 200, description = "Presigned download link", body = DownloadUrl),
        (status = 404, description = "Achievement not found", body = ErrorBody)
    )
)]
pub async fn download_achievement(
    Auth(actor): Auth,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DownloadUrl>, ApiError> {
    Ok(Json(state.backends.files.download_url(&actor.id, &name).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/user/achievements/{id}",
    tag = "Achievements",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Achievement name")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Achievement not found", body = ErrorBody)
    )
)]
pub async fn delete_achievement(
    Auth(actor): Auth,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.backends.files.delete_file(&actor.id, &name).await?;
    Ok(Json(MessageResponse::new("Achievement deleted successfully")))
}
