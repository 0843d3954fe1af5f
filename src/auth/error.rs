// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::{ApiError, ErrorKind};

/// Rejections produced by the identity and policy layers.
///
/// Messages stay generic. A denial never names the role that would have
/// been accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization header format")]
    InvalidAuthHeader,
    /// Auth backend rejected the token
    #[error("Invalid or expired token")]
    InvalidToken,
    /// Auth backend returned a role this gateway does not know
    #[error("Unknown role")]
    UnknownRole,
    /// Auth backend could not be reached
    #[error("Authentication service unavailable")]
    ServiceUnavailable,
    /// Protected route reached without a resolved actor
    #[error("Authentication required")]
    NotAuthenticated,
    /// Authenticated, but the guard chain denied access
    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            AuthError::InsufficientPermissions => "PERMISSION_DENIED",
            _ => "UNAUTHENTICATED",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::ServiceUnavailable => ErrorKind::Unavailable,
            AuthError::InsufficientPermissions => ErrorKind::PermissionDenied,
            _ => ErrorKind::Unauthenticated,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::new(err.kind(), err.error_code(), err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
