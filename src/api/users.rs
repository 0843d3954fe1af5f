// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student and HR profile endpoints.
//!
//! `/users/*` and `/hr/*` share the same profile backend; they differ only
//! in which roles may reach them.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    Json,
};

use super::files::{read_file, remove_file, store_file, upload_response};
use crate::{
    auth::{Actor, Auth},
    error::{ApiError, ErrorBody},
    models::{
        FileCategory, FileUploadResponse, MessageResponse, Portfolio, ProfileFilter, ProfilePatch,
        UserList, UserProfile,
    },
    orchestration::{delete_account, fetch_both, AccountKind, DeletionOutcome, EntityKind},
    state::AppState,
};

pub(crate) fn validate_user_id(id: &str) -> Result<(), ApiError> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ApiError::bad_request("INVALID_ID", "Invalid user ID format"))
}

async fn enriched_profile(state: &AppState, user_id: &str) -> Result<UserProfile, ApiError> {
    let record = state.backends.users.get_profile(user_id).await?;
    let mut profile = UserProfile::from(record);
    state.enricher.enrich(&mut profile).await;
    Ok(profile)
}

async fn enriched_list(state: &AppState, filter: ProfileFilter) -> Result<UserList, ApiError> {
    let page = state.backends.users.list_profiles(&filter).await?;
    let mut profiles: Vec<UserProfile> = page.profiles.into_iter().map(Into::into).collect();
    state.enricher.enrich_all(&mut profiles).await;
    Ok(UserList {
        profiles,
        pagination: page.pagination,
    })
}

async fn apply_patch(
    state: &AppState,
    actor: &Actor,
    patch: ProfilePatch,
) -> Result<UserProfile, ApiError> {
    let record = state.backends.users.update_profile(&actor.id, &patch).await?;
    let mut profile = UserProfile::from(record);
    state.enricher.enrich(&mut profile).await;
    Ok(profile)
}

pub(crate) fn deletion_response(outcome: DeletionOutcome) -> Json<MessageResponse> {
    let mut response = MessageResponse::new("Account deleted successfully");
    if let DeletionOutcome::DeletedWithWarning(warning) = outcome {
        response.warning = Some(warning);
    }
    Json(response)
}

/// List profiles with their file links.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ProfileFilter),
    responses(
        (status = 200, description = "Profiles", body = UserList),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ProfileFilter>, QueryRejection>,
) -> Result<Json<UserList>, ApiError> {
    let Query(filter) = query?;
    Ok(Json(enriched_list(&state, filter).await?))
}

/// Same listing, reachable from the HR section.
#[utoipa::path(
    get,
    path = "/api/v1/hr",
    tag = "HR",
    security(("bearer_auth" = [])),
    params(ProfileFilter),
    responses(
        (status = 200, description = "Profiles", body = UserList),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn list_hr_view(
    State(state): State<AppState>,
    query: Result<Query<ProfileFilter>, QueryRejection>,
) -> Result<Json<UserList>, ApiError> {
    let Query(filter) = query?;
    Ok(Json(enriched_list(&state, filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = UserProfile),
        (status = 404, description = "Profile not found", body = ErrorBody)
    )
)]
pub async fn get_me(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(enriched_profile(&state, &actor.id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/hr/me",
    tag = "HR",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own HR profile", body = UserProfile),
        (status = 404, description = "Profile not found", body = ErrorBody)
    )
)]
pub async fn hr_me(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(enriched_profile(&state, &actor.id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Profile not found", body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    validate_user_id(&id)?;
    Ok(Json(enriched_profile(&state, &id).await?))
}

/// Profile and achievements together. Either failing fails the request.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/portfolio",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Profile and achievements", body = Portfolio),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Profile not found", body = ErrorBody)
    )
)]
pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Portfolio>, ApiError> {
    validate_user_id(&id)?;

    let (record, achievements) = fetch_both(
        state.backends.users.get_profile(&id),
        state.backends.files.list_files(&id),
    )
    .await?;

    let mut profile = UserProfile::from(record);
    state.enricher.enrich(&mut profile).await;
    Ok(Json(Portfolio {
        profile,
        achievements,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/edit",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid body", body = ErrorBody)
    )
)]
pub async fn update_me(
    Auth(actor): Auth,
    State(state): State<AppState>,
    payload: Result<Json<ProfilePatch>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(apply_patch(&state, &actor, patch).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/hr/edit",
    tag = "HR",
    security(("bearer_auth" = [])),
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid body", body = ErrorBody)
    )
)]
pub async fn hr_update(
    Auth(actor): Auth,
    State(state): State<AppState>,
    payload: Result<Json<ProfilePatch>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(apply_patch(&state, &actor, patch).await?))
}

/// Delete the caller's profile and credential.
#[utoipa::path(
    delete,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted, possibly with a warning", body = MessageResponse),
        (status = 503, description = "Profile backend unavailable", body = ErrorBody)
    )
)]
pub async fn delete_me(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = delete_account(&state.backends, AccountKind::Profile, &actor.id).await?;
    Ok(deletion_response(outcome))
}

#[utoipa::path(
    delete,
    path = "/api/v1/hr",
    tag = "HR",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted, possibly with a warning", body = MessageResponse),
        (status = 503, description = "Profile backend unavailable", body = ErrorBody)
    )
)]
pub async fn hr_delete(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = delete_account(&state.backends, AccountKind::Profile, &actor.id).await?;
    Ok(deletion_response(outcome))
}

fn profile_patch(category: FileCategory, file_id: String) -> ProfilePatch {
    match category {
        FileCategory::Resume => ProfilePatch {
            resume_id: Some(file_id),
            ..Default::default()
        },
        _ => ProfilePatch {
            avatar_id: Some(file_id),
            ..Default::default()
        },
    }
}

async fn upload_profile_file(
    state: &AppState,
    actor: &Actor,
    category: FileCategory,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FileUploadResponse>, ApiError> {
    let file = read_file(multipart, category.as_str()).await?;
    let stored = store_file(state, EntityKind::User, &actor.id, category, file).await?;

    if let Err(e) = state
        .backends
        .users
        .update_profile(&actor.id, &profile_patch(category, stored.key.clone()))
        .await
    {
        tracing::warn!(user_id = %actor.id, %category, error = %e, "Profile not linked to uploaded file");
    }

    let message = match category {
        FileCategory::Resume => "Resume uploaded successfully",
        _ => "Avatar uploaded successfully",
    };
    Ok(upload_response(state, &actor.id, &stored, category, message).await)
}

async fn delete_profile_file(
    state: &AppState,
    actor: &Actor,
    category: FileCategory,
) -> Result<Json<MessageResponse>, ApiError> {
    let profile = state.backends.users.get_profile(&actor.id).await?;
    let file_id = match category {
        FileCategory::Resume => profile.resume_id,
        _ => profile.avatar_id,
    };
    remove_file(state, &actor.id, &file_id).await?;

    if let Err(e) = state
        .backends
        .users
        .update_profile(&actor.id, &profile_patch(category, String::new()))
        .await
    {
        tracing::warn!(user_id = %actor.id, %category, error = %e, "Profile file link not cleared");
    }
    Ok(Json(MessageResponse::new(format!(
        "{} deleted successfully",
        match category {
            FileCategory::Resume => "Resume",
            _ => "Avatar",
        }
    ))))
}

/// Multipart field `avatar`, at most 5 MiB.
#[utoipa::path(
    post,
    path = "/api/v1/users/files/avatar",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body(content_type = "multipart/form-data", description = "Field `avatar`"),
    responses(
        (status = 200, description = "Uploaded", body = FileUploadResponse),
        (status = 400, description = "No file or file too large", body = ErrorBody)
    )
)]
pub async fn upload_avatar(
    Auth(actor): Auth,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FileUploadResponse>, ApiError> {
    upload_profile_file(&state, &actor, FileCategory::Avatar, multipart).await
}

/// Multipart field `resume`, at most 10 MiB.
#[utoipa::path(
    post,
    path = "/api/v1/users/files/resume",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body(content_type = "multipart/form-data", description = "Field `resume`"),
    responses(
        (status = 200, description = "Uploaded", body = FileUploadResponse),
        (status = 400, description = "No file or file too large", body = ErrorBody)
    )
)]
pub async fn upload_resume(
    Auth(actor): Auth,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FileUploadResponse>, ApiError> {
    upload_profile_file(&state, &actor, FileCategory::Resume, multipart).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/files/avatar",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "No avatar set", body = ErrorBody)
    )
)]
pub async fn delete_avatar(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_profile_file(&state, &actor, FileCategory::Avatar).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/files/resume",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "No resume set", body = ErrorBody)
    )
)]
pub async fn delete_resume(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete_profile_file(&state, &actor, FileCategory::Resume).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_ids_must_be_uuids() {
        assert!(validate_user_id("0b5e4c9e-7a53-4f43-9d1e-0c1a6a0f4b11").is_ok());
        assert_eq!(validate_user_id("u-1").unwrap_err().code, "INVALID_ID");
    }

    #[test]
    fn warning_is_carried_into_response() {
        let Json(response) =
            deletion_response(DeletionOutcome::DeletedWithWarning("credential kept".into()));
        assert_eq!(response.warning.as_deref(), Some("credential kept"));

        let Json(response) = deletion_response(DeletionOutcome::Deleted);
        assert!(response.warning.is_none());
    }
}
