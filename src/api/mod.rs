// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface.
//!
//! Every application route lives under `/api/v1` and passes through
//! [`authenticate`]. Each route then carries its own guard chain through
//! [`require`]. Health probes and the API docs sit outside that pipeline.

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{
        middleware::{authenticate, require},
        Guard,
        Role::{self, CompanyOwner, Developer, Employer, Student},
    },
    error::ErrorBody,
    models::{
        AchievementUploadRequest, AchievementUploadResponse, AuthRequest, AuthResponse, Company,
        CompanyList, CompanyPatch, CompanyRecord, ConfirmUploadRequest, DownloadUrl, FileCategory,
        FileInfo, FileMeta, FileMetaList, FileUploadResponse, MessageResponse, MimeClass,
        PaginationInfo, PositionList, Portfolio, ProfilePatch, ProfileRecord, UploadTicket,
        UserList, UserProfile, Vacancy, VacancyDraft, VacancyList, VacancyRecord,
    },
    state::AppState,
};

pub mod achievements;
pub mod auth;
pub mod companies;
pub mod files;
pub mod health;
pub mod users;
pub mod vacancies;

/// Largest accepted request body: the 10 MiB upload ceiling plus multipart framing.
pub const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

const ANY_ROLE: &[Guard] = &[Guard::Roles(&[Developer, Student, Employer, CompanyOwner])];
const STUDENTS: &[Guard] = &[Guard::Roles(&[Developer, Student])];
const STUDENTS_AND_HR: &[Guard] = &[Guard::Roles(&[Developer, Student, Employer])];
const HR: &[Guard] = &[Guard::Roles(&[Developer, Employer])];
const COMPANY_OWNERS: &[Guard] = &[Guard::Roles(&[Developer, CompanyOwner])];

const OWNER_OR_HR: &[Guard] = &[Guard::OwnerOrRoles {
    param: "id",
    roles: &[Developer, Employer],
}];
const OWNER_OR_STUDENTS: &[Guard] = &[Guard::OwnerOrRoles {
    param: "id",
    roles: &[Developer, Student],
}];
const OWNER_OR_STUDENTS_AND_HR: &[Guard] = &[Guard::OwnerOrRoles {
    param: "id",
    roles: &[Developer, Student, Employer],
}];
const OWNER_OR_COMPANY_OWNERS: &[Guard] = &[Guard::OwnerOrRoles {
    param: "id",
    roles: &[Developer, CompanyOwner],
}];

fn v1_routes() -> Router<AppState> {
    Router::new()
        // auth
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route(
            "/auth/logout",
            post(auth::logout).route_layer(require(ANY_ROLE)),
        )
        // files
        .route(
            "/files/{entity_id}/{file_name}",
            get(files::serve_file).route_layer(require(ANY_ROLE)),
        )
        // users
        .route("/users", get(users::list_users).route_layer(require(ANY_ROLE)))
        .route("/users", delete(users::delete_me).route_layer(require(STUDENTS)))
        .route("/users/me", get(users::get_me).route_layer(require(STUDENTS)))
        .route(
            "/users/edit",
            patch(users::update_me).route_layer(require(STUDENTS)),
        )
        .route(
            "/users/{id}",
            get(users::get_user).route_layer(require(STUDENTS_AND_HR)),
        )
        .route(
            "/users/{id}/portfolio",
            get(users::get_portfolio).route_layer(require(OWNER_OR_HR)),
        )
        .route(
            "/users/files/avatar",
            post(users::upload_avatar)
                .delete(users::delete_avatar)
                .route_layer(require(STUDENTS_AND_HR)),
        )
        .route(
            "/users/files/resume",
            post(users::upload_resume)
                .delete(users::delete_resume)
                .route_layer(require(STUDENTS_AND_HR)),
        )
        // achievements
        .route(
            "/user/achievements",
            get(achievements::list_achievements).route_layer(require(STUDENTS_AND_HR)),
        )
        .route(
            "/user/achievements",
            post(achievements::create_achievement).route_layer(require(STUDENTS)),
        )
        .route(
            "/user/achievements/{id}",
            delete(achievements::delete_achievement).route_layer(require(OWNER_OR_STUDENTS)),
        )
        .route(
            "/user/achievements/{id}/confirm",
            post(achievements::confirm_achievement).route_layer(require(OWNER_OR_STUDENTS)),
        )
        .route(
            "/user/achievements/{id}/download",
            get(achievements::download_achievement)
                .route_layer(require(OWNER_OR_STUDENTS_AND_HR)),
        )
        // hr
        .route("/hr", get(users::list_hr_view).route_layer(require(ANY_ROLE)))
        .route("/hr", delete(users::hr_delete).route_layer(require(HR)))
        .route("/hr/me", get(users::hr_me).route_layer(require(HR)))
        .route("/hr/edit", patch(users::hr_update).route_layer(require(HR)))
        .route(
            "/hr/vacancy",
            get(vacancies::list_hr_vacancies)
                .post(vacancies::create_vacancy)
                .route_layer(require(HR)),
        )
        .route(
            "/hr/vacancy/{id}",
            get(vacancies::hr_get_vacancy)
                .patch(vacancies::update_vacancy)
                .delete(vacancies::delete_vacancy)
                .route_layer(require(OWNER_OR_HR)),
        )
        .route(
            "/positions",
            get(vacancies::list_positions).route_layer(require(HR)),
        )
        // vacancies
        .route(
            "/vacancy",
            get(vacancies::list_vacancies).route_layer(require(STUDENTS_AND_HR)),
        )
        .route(
            "/vacancy/{id}",
            get(vacancies::get_vacancy).route_layer(require(STUDENTS_AND_HR)),
        )
        .route(
            "/vacancy/{id}/files/attachment",
            post(vacancies::upload_attachment)
                .delete(vacancies::delete_attachment)
                .route_layer(require(OWNER_OR_HR)),
        )
        // companies
        .route(
            "/company",
            get(companies::list_companies).route_layer(require(ANY_ROLE)),
        )
        .route(
            "/company",
            patch(companies::update_company)
                .delete(companies::delete_company)
                .route_layer(require(COMPANY_OWNERS)),
        )
        .route(
            "/company/me",
            get(companies::my_company).route_layer(require(COMPANY_OWNERS)),
        )
        .route(
            "/company/{id}",
            get(companies::get_company).route_layer(require(ANY_ROLE)),
        )
        .route(
            "/company/{id}/files/logo",
            post(companies::upload_logo)
                .delete(companies::delete_logo)
                .route_layer(require(OWNER_OR_COMPANY_OWNERS)),
        )
        .route(
            "/company/{id}/files/documents",
            post(companies::upload_document).route_layer(require(OWNER_OR_COMPANY_OWNERS)),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", v1_routes())
        .layer(from_fn_with_state(state.clone(), authenticate))
        .merge(health_routes())
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        auth::login,
        auth::register,
        auth::logout,
        files::serve_file,
        users::list_users,
        users::get_me,
        users::get_user,
        users::get_portfolio,
        users::update_me,
        users::delete_me,
        users::upload_avatar,
        users::delete_avatar,
        users::upload_resume,
        users::delete_resume,
        users::list_hr_view,
        users::hr_me,
        users::hr_update,
        users::hr_delete,
        achievements::list_achievements,
        achievements::create_achievement,
        achievements::confirm_achievement,
        achievements::download_achievement,
        achievements::delete_achievement,
        vacancies::list_vacancies,
        vacancies::get_vacancy,
        vacancies::list_hr_vacancies,
        vacancies::hr_get_vacancy,
        vacancies::create_vacancy,
        vacancies::update_vacancy,
        vacancies::delete_vacancy,
        vacancies::list_positions,
        vacancies::upload_attachment,
        vacancies::delete_attachment,
        companies::list_companies,
        companies::get_company,
        companies::my_company,
        companies::update_company,
        companies::delete_company,
        companies::upload_logo,
        companies::upload_document,
        companies::delete_logo,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            ErrorBody,
            MessageResponse,
            PaginationInfo,
            Role,
            AuthRequest,
            AuthResponse,
            FileCategory,
            MimeClass,
            FileInfo,
            FileUploadResponse,
            FileMeta,
            FileMetaList,
            DownloadUrl,
            UploadTicket,
            AchievementUploadRequest,
            AchievementUploadResponse,
            ConfirmUploadRequest,
            ProfileRecord,
            ProfilePatch,
            UserProfile,
            UserList,
            Portfolio,
            CompanyRecord,
            CompanyPatch,
            Company,
            CompanyList,
            VacancyRecord,
            VacancyDraft,
            Vacancy,
            VacancyList,
            PositionList,
            health::ReadyResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Login, registration and logout"),
        (name = "Users", description = "Student profiles and their files"),
        (name = "HR", description = "HR profiles and vacancy management"),
        (name = "Achievements", description = "Achievement uploads"),
        (name = "Vacancies", description = "Vacancy catalogue"),
        (name = "Companies", description = "Company records and files"),
        (name = "Files", description = "Direct file access"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
