// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::Service;
use crate::state::AppState;

/// Health check response with per-backend status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Backend name to "enabled" or "disabled".
    pub backends: BTreeMap<String, String>,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn backend_report(state: &AppState) -> (bool, ReadyResponse) {
    let availability = state.backends.availability();

    // Nothing but login and registration works without the auth backend.
    let ready = availability
        .iter()
        .any(|(service, enabled)| *service == Service::Auth && *enabled);

    let backends = availability
        .iter()
        .map(|(service, enabled)| {
            let status = if *enabled { "enabled" } else { "disabled" };
            (service.name().to_string(), status.to_string())
        })
        .collect();

    let all_enabled = availability.iter().all(|(_, enabled)| *enabled);
    let response = ReadyResponse {
        status: if all_enabled { "ok" } else { "degraded" }.to_string(),
        backends,
    };
    (ready, response)
}

/// Overall status. Always 200; a gateway with disabled backends still serves.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Gateway is running", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(backend_report(&state).1)
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Returns 503 while the auth backend is disabled.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Auth backend disabled", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let (ready, response) = backend_report(&state);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
