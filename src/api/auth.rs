// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, registration and logout.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{Auth, AuthError, Role},
    backend::{Credentials, Session},
    error::{ApiError, ErrorBody},
    models::{AuthRequest, AuthResponse, MessageResponse},
    orchestration::register_account,
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

fn require_fields(request: &AuthRequest) -> Result<(), ApiError> {
    if request.email.trim().is_empty() || request.password.is_empty() || request.role.is_empty() {
        return Err(ApiError::bad_request(
            "MISSING_FIELDS",
            "Email, password and role are required",
        ));
    }
    Ok(())
}

fn parse_role(role: &str) -> Result<Role, ApiError> {
    role.parse::<Role>()
        .map_err(|_| ApiError::bad_request("INVALID_ROLE", "Unknown role"))
}

/// The role always comes from the auth backend. A session without a
/// recognised role is not handed out.
fn session_response(session: Session) -> Result<AuthResponse, ApiError> {
    let role = Role::try_from(session.role).map_err(|_| {
        tracing::error!(user_id = %session.user_uuid, role = ?session.role, "Auth backend returned unknown role");
        AuthError::UnknownRole
    })?;
    Ok(AuthResponse {
        role,
        token: session.token,
        user_uuid: session.user_uuid,
    })
}

/// Exchange credentials for a token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Missing fields or unknown role", body = ErrorBody),
        (status = 401, description = "Invalid credentials or unknown role", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload?;
    require_fields(&request)?;
    let role = parse_role(&request.role)?;

    let session = state
        .backends
        .auth
        .login(&Credentials {
            email: request.email,
            password: request.password,
            role: role.into(),
        })
        .await?;

    tracing::info!(user_id = %session.user_uuid, "Login succeeded");
    Ok(Json(session_response(session)?))
}

/// Create an account and its profile (or company, for owners).
///
/// If the profile cannot be created the credential is removed again and
/// the profile error is returned.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = AuthRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing fields, weak password or unknown role", body = ErrorBody),
        (status = 409, description = "Account already exists", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = payload?;
    require_fields(&request)?;
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(
            "WEAK_PASSWORD",
            "Password must be at least 6 characters long",
        ));
    }
    let role = parse_role(&request.role)?;

    let session =
        register_account(&state.backends, &request.email, &request.password, role).await?;

    Ok((StatusCode::CREATED, Json(session_response(session)?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sessions ended", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn logout(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.backends.auth.logout(&actor.id).await?;
    tracing::info!(user_id = %actor.id, "Logout succeeded");
    Ok(Json(MessageResponse::new("Logged out successfully")))
}
