// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Company endpoints. A company shares its id with its owner's account.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    Json,
};

use super::{
    files::{read_file, remove_file, store_file, upload_response},
    users::deletion_response,
};
use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{
        Company, CompanyFilter, CompanyList, CompanyPatch, FileCategory, FileUploadResponse,
        MessageResponse,
    },
    orchestration::{delete_account, AccountKind, EntityKind},
    state::AppState,
};

async fn enriched_company(state: &AppState, id: &str) -> Result<Company, ApiError> {
    let mut company = Company::from(state.backends.companies.get_company(id).await?);
    state.enricher.enrich(&mut company).await;
    Ok(company)
}

#[utoipa::path(
    get,
    path = "/api/v1/company",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(CompanyFilter),
    responses(
        (status = 200, description = "Companies", body = CompanyList),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    )
)]
pub async fn list_companies(
    State(state): State<AppState>,
    query: Result<Query<CompanyFilter>, QueryRejection>,
) -> Result<Json<CompanyList>, ApiError> {
    let Query(filter) = query?;
    let page = state.backends.companies.list_companies(&filter).await?;

    let mut companies: Vec<Company> = page.companies.into_iter().map(Into::into).collect();
    state.enricher.enrich_all(&mut companies).await;
    Ok(Json(CompanyList {
        companies,
        pagination: page.pagination,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/company/{id}",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company", body = Company),
        (status = 404, description = "Company not found", body = ErrorBody)
    )
)]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Company>, ApiError> {
    Ok(Json(enriched_company(&state, &id).await?))
}

/// The caller's own company.
#[utoipa::path(
    get,
    path = "/api/v1/company/me",
    tag = "Companies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own company", body = Company),
        (status = 404, description = "Company not found", body = ErrorBody)
    )
)]
pub async fn my_company(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<Company>, ApiError> {
    Ok(Json(enriched_company(&state, &actor.id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/company",
    tag = "Companies",
    security(("bearer_auth" = [])),
    request_body = CompanyPatch,
    responses(
        (status = 200, description = "Updated", body = Company),
        (status = 404, description = "Company not found", body = ErrorBody)
    )
)]
pub async fn update_company(
    Auth(actor): Auth,
    State(state): State<AppState>,
    payload: Result<Json<CompanyPatch>, JsonRejection>,
) -> Result<Json<Company>, ApiError> {
    let Json(patch) = payload?;
    let record = state
        .backends
        .companies
        .update_company(&actor.id, &patch)
        .await?;

    let mut company = Company::from(record);
    state.enricher.enrich(&mut company).await;
    Ok(Json(company))
}

/// Delete the caller's company, its logo and the owner's credential.
#[utoipa::path(
    delete,
    path = "/api/v1/company",
    tag = "Companies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted, possibly with a warning", body = MessageResponse),
        (status = 503, description = "Company backend unavailable", body = ErrorBody)
    )
)]
pub async fn delete_company(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = delete_account(&state.backends, AccountKind::Company, &actor.id).await?;
    Ok(deletion_response(outcome))
}

/// Multipart field `logo`, at most 5 MiB.
#[utoipa::path(
    post,
    path = "/api/v1/company/{id}/files/logo",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Company ID")),
    request_body(content_type = "multipart/form-data", description = "Field `logo`"),
    responses(
        (status = 200, description = "Uploaded", body = FileUploadResponse),
        (status = 400, description = "No file or file too large", body = ErrorBody)
    )
)]
pub async fn upload_logo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FileUploadResponse>, ApiError> {
    let file = read_file(multipart, "logo").await?;
    let category = FileCategory::Logo;
    let stored = store_file(&state, EntityKind::Company, &id, category, file).await?;

    let link = CompanyPatch {
        logo_id: Some(stored.key.clone()),
        ..Default::default()
    };
    if let Err(e) = state.backends.companies.update_company(&id, &link).await {
        tracing::warn!(company_id = %id, error = %e, "Company not linked to uploaded logo");
    }

    Ok(upload_response(&state, &id, &stored, category, "Company logo uploaded successfully").await)
}

/// Multipart field `document`, at most 10 MiB. Documents are not linked
/// from the company record.
#[utoipa::path(
    post,
    path = "/api/v1/company/{id}/files/documents",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Company ID")),
    request_body(content_type = "multipart/form-data", description = "Field `document`"),
    responses(
        (status = 200, description = "Uploaded", body = FileUploadResponse),
        (status = 400, description = "No file or file too large", body = ErrorBody)
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FileUploadResponse>, ApiError> {
    let file = read_file(multipart, "document").await?;
    let category = FileCategory::Document;
    let stored = store_file(&state, EntityKind::Company, &id, category, file).await?;
    Ok(upload_response(&state, &id, &stored, category, "Company document uploaded successfully").await)
}

#[utoipa::path(
    delete,
    path = "/api/v1/company/{id}/files/logo",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "No logo set", body = ErrorBody),
        (status = 404, description = "Company not found", body = ErrorBody)
    )
)]
pub async fn delete_logo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let company = state.backends.companies.get_company(&id).await?;
    remove_file(&state, &id, &company.logo_id).await?;

    let unlink = CompanyPatch {
        logo_id: Some(String::new()),
        ..Default::default()
    };
    if let Err(e) = state.backends.companies.update_company(&id, &unlink).await {
        tracing::warn!(company_id = %id, error = %e, "Company logo link not cleared");
    }
    Ok(Json(MessageResponse::new("Company logo deleted successfully")))
}
