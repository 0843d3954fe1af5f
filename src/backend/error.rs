// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Backend call failures.

use serde::Deserialize;

/// The five backends behind the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Auth,
    Users,
    Company,
    Vacancy,
    Achievement,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Auth,
        Service::Users,
        Service::Company,
        Service::Vacancy,
        Service::Achievement,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Service::Auth => "auth",
            Service::Users => "users",
            Service::Company => "company",
            Service::Vacancy => "vacancy",
            Service::Achievement => "achievement",
        }
    }

    /// Fully qualified RPC service path segment.
    pub fn rpc_path(&self) -> &'static str {
        match self {
            Service::Auth => "auth.v1.AuthService",
            Service::Users => "users.v1.UsersService",
            Service::Company => "company.v1.CompanyService",
            Service::Vacancy => "vacancy.v1.VacancyService",
            Service::Achievement => "achievement.v1.AchievementService",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical RPC status, as reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendStatus {
    Unauthenticated,
    PermissionDenied,
    NotFound,
    AlreadyExists,
    InvalidArgument,
    Unavailable,
    DeadlineExceeded,
    Internal,
    #[serde(other)]
    Unknown,
}

impl BackendStatus {
    /// Fallback when an error response carries no status body.
    pub fn from_http(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            400 | 422 => BackendStatus::InvalidArgument,
            401 => BackendStatus::Unauthenticated,
            403 => BackendStatus::PermissionDenied,
            404 => BackendStatus::NotFound,
            409 => BackendStatus::AlreadyExists,
            502 | 503 => BackendStatus::Unavailable,
            504 => BackendStatus::DeadlineExceeded,
            _ => BackendStatus::Internal,
        }
    }
}

/// A failed call to one backend.
///
/// `message` is for logs only. Clients see the translated
/// [`ApiError`](crate::error::ApiError).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{service} backend returned {status:?}: {message}")]
pub struct BackendError {
    pub service: Service,
    pub status: BackendStatus,
    pub message: String,
}

impl BackendError {
    pub fn new(service: Service, status: BackendStatus, message: impl Into<String>) -> Self {
        Self {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn disabled(service: Service) -> Self {
        Self::new(
            service,
            BackendStatus::Unavailable,
            format!("{service} backend disabled"),
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.status == BackendStatus::NotFound
    }
}
