// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vacancy endpoints: the public catalogue and HR management.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use super::files::{read_file, remove_file, store_file, upload_response};
use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{
        FileCategory, FileUploadResponse, MessageResponse, PositionList, Vacancy, VacancyDraft,
        VacancyFilter, VacancyList, VacancyPage,
    },
    orchestration::EntityKind,
    state::AppState,
};

async fn enriched(state: &AppState, page: VacancyPage) -> VacancyList {
    let mut vacancies: Vec<Vacancy> = page.vacancies.into_iter().map(Into::into).collect();
    state.enricher.enrich_all(&mut vacancies).await;
    VacancyList {
        vacancies,
        pagination: page.pagination,
    }
}

async fn enriched_one(state: &AppState, id: &str) -> Result<Vacancy, ApiError> {
    let mut vacancy = Vacancy::from(state.backends.vacancies.get_vacancy(id).await?);
    state.enricher.enrich(&mut vacancy).await;
    Ok(vacancy)
}

#[utoipa::path(
    get,
    path = "/api/v1/vacancy",
    tag = "Vacancies",
    security(("bearer_auth" = [])),
    params(VacancyFilter),
    responses(
        (status = 200, description = "Vacancies", body = VacancyList),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    )
)]
pub async fn list_vacancies(
    State(state): State<AppState>,
    query: Result<Query<VacancyFilter>, QueryRejection>,
) -> Result<Json<VacancyList>, ApiError> {
    let Query(filter) = query?;
    let page = state.backends.vacancies.list_vacancies(&filter).await?;
    Ok(Json(enriched(&state, page).await))
}

#[utoipa::path(
    get,
    path = "/api/v1/vacancy/{id}",
    tag = "Vacancies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vacancy ID")),
    responses(
        (status = 200, description = "Vacancy", body = Vacancy),
        (status = 404, description = "Vacancy not found", body = ErrorBody)
    )
)]
pub async fn get_vacancy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vacancy>, ApiError> {
    Ok(Json(enriched_one(&state, &id).await?))
}

/// Vacancy as seen from the HR section.
#[utoipa::path(
    get,
    path = "/api/v1/hr/vacancy/{id}",
    tag = "HR",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vacancy ID")),
    responses(
        (status = 200, description = "Vacancy", body = Vacancy),
        (status = 404, description = "Vacancy not found", body = ErrorBody)
    )
)]
pub async fn hr_get_vacancy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vacancy>, ApiError> {
    Ok(Json(enriched_one(&state, &id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/hr/vacancy",
    tag = "HR",
    security(("bearer_auth" = [])),
    params(VacancyFilter),
    responses(
        (status = 200, description = "Vacancies managed by HR", body = VacancyList),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    )
)]
pub async fn list_hr_vacancies(
    Auth(actor): Auth,
    State(state): State<AppState>,
    query: Result<Query<VacancyFilter>, QueryRejection>,
) -> Result<Json<VacancyList>, ApiError> {
    let Query(filter) = query?;
    let page = state.backends.vacancies.list_hr_vacancies(&filter).await?;
    tracing::debug!(user_id = %actor.id, count = page.vacancies.len(), "Listed HR vacancies");
    Ok(Json(enriched(&state, page).await))
}

#[utoipa::path(
    post,
    path = "/api/v1/hr/vacancy",
    tag = "HR",
    security(("bearer_auth" = [])),
    request_body = VacancyDraft,
    responses(
        (status = 201, description = "Created", body = Vacancy),
        (status = 400, description = "Missing title or company", body = ErrorBody)
    )
)]
pub async fn create_vacancy(
    Auth(actor): Auth,
    State(state): State<AppState>,
    payload: Result<Json<VacancyDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Vacancy>), ApiError> {
    let Json(draft) = payload?;
    if let Some(field) = draft.missing_field() {
        return Err(ApiError::bad_request(
            "MISSING_FIELDS",
            format!("Field `{field}` is required"),
        ));
    }

    let mut vacancy = Vacancy::from(state.backends.vacancies.create_vacancy(&draft).await?);
    state.enricher.enrich(&mut vacancy).await;

    tracing::info!(
        vacancy_id = %vacancy.vacancy.id,
        company_id = %vacancy.vacancy.company_id,
        user_id = %actor.id,
        "Vacancy created"
    );
    Ok((StatusCode::CREATED, Json(vacancy)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/hr/vacancy/{id}",
    tag = "HR",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vacancy ID")),
    request_body = VacancyDraft,
    responses(
        (status = 200, description = "Updated", body = Vacancy),
        (status = 404, description = "Vacancy not found", body = ErrorBody)
    )
)]
pub async fn update_vacancy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<VacancyDraft>, JsonRejection>,
) -> Result<Json<Vacancy>, ApiError> {
    let Json(draft) = payload?;
    let mut vacancy = Vacancy::from(state.backends.vacancies.update_vacancy(&id, &draft).await?);
    state.enricher.enrich(&mut vacancy).await;
    Ok(Json(vacancy))
}

#[utoipa::path(
    delete,
    path = "/api/v1/hr/vacancy/{id}",
    tag = "HR",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vacancy ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Vacancy not found", body = ErrorBody)
    )
)]
pub async fn delete_vacancy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.backends.vacancies.delete_vacancy(&id).await?;
    Ok(Json(MessageResponse::new("Vacancy deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/v1/positions",
    tag = "Vacancies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Known positions", body = PositionList)
    )
)]
pub async fn list_positions(State(state): State<AppState>) -> Result<Json<PositionList>, ApiError> {
    Ok(Json(state.backends.vacancies.positions().await?))
}

/// Multipart field `attachment`, at most 10 MiB.
#[utoipa::path(
    post,
    path = "/api/v1/vacancy/{id}/files/attachment",
    tag = "Vacancies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vacancy ID")),
    request_body(content_type = "multipart/form-data", description = "Field `attachment`"),
    responses(
        (status = 200, description = "Uploaded", body = FileUploadResponse),
        (status = 400, description = "No file or file too large", body = ErrorBody),
        (status = 404, description = "Vacancy not found", body = ErrorBody)
    )
)]
pub async fn upload_attachment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FileUploadResponse>, ApiError> {
    let file = read_file(multipart, "attachment").await?;
    state.backends.vacancies.get_vacancy(&id).await?;

    let category = FileCategory::Attachment;
    let stored = store_file(&state, EntityKind::Vacancy, &id, category, file).await?;

    let link = VacancyDraft {
        attachment_id: Some(stored.key.clone()),
        ..Default::default()
    };
    if let Err(e) = state.backends.vacancies.update_vacancy(&id, &link).await {
        tracing::warn!(vacancy_id = %id, error = %e, "Vacancy not linked to uploaded attachment");
    }

    Ok(upload_response(&state, &id, &stored, category, "Vacancy attachment uploaded successfully").await)
}

#[utoipa::path(
    delete,
    path = "/api/v1/vacancy/{id}/files/attachment",
    tag = "Vacancies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vacancy ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "No attachment", body = ErrorBody),
        (status = 404, description = "Vacancy not found", body = ErrorBody)
    )
)]
pub async fn delete_attachment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let vacancy = state.backends.vacancies.get_vacancy(&id).await?;
    remove_file(&state, &id, &vacancy.attachment_id).await?;

    let unlink = VacancyDraft {
        attachment_id: Some(String::new()),
        ..Default::default()
    };
    if let Err(e) = state.backends.vacancies.update_vacancy(&id, &unlink).await {
        tracing::warn!(vacancy_id = %id, error = %e, "Vacancy attachment link not cleared");
    }
    Ok(Json(MessageResponse::new("Vacancy attachment deleted successfully")))
}
