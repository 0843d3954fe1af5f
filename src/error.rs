// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::{BackendError, BackendStatus};

/// Gateway error taxonomy. Every failure is translated into one of these
/// before it reaches a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    PermissionDenied,
    NotFound,
    AlreadyExists,
    InvalidArgument,
    Unavailable,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    /// Stable machine-readable code, independent of the HTTP status.
    pub code: &'static str,
    pub message: String,
}

/// Error envelope returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, code, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, "NOT_FOUND", message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, "SERVICE_UNAVAILABLE", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, "INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status_code()
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        let (kind, code, message) = match err.status {
            BackendStatus::Unauthenticated => (
                ErrorKind::Unauthenticated,
                "INVALID_CREDENTIALS",
                "Invalid credentials",
            ),
            BackendStatus::AlreadyExists => {
                (ErrorKind::AlreadyExists, "USER_EXISTS", "Already exists")
            }
            BackendStatus::InvalidArgument => {
                (ErrorKind::InvalidArgument, "INVALID_DATA", "Invalid data")
            }
            BackendStatus::NotFound => (ErrorKind::NotFound, "NOT_FOUND", "Resource not found"),
            BackendStatus::PermissionDenied => (
                ErrorKind::PermissionDenied,
                "PERMISSION_DENIED",
                "Insufficient permissions",
            ),
            BackendStatus::Unavailable | BackendStatus::DeadlineExceeded => (
                ErrorKind::Unavailable,
                "SERVICE_UNAVAILABLE",
                "Service temporarily unavailable",
            ),
            BackendStatus::Internal | BackendStatus::Unknown => (
                ErrorKind::Internal,
                "INTERNAL_ERROR",
                "Internal server error",
            ),
        };

        if matches!(kind, ErrorKind::Internal | ErrorKind::Unavailable) {
            tracing::warn!(service = %err.service, status = ?err.status, error = %err.message, "Backend call failed");
        } else {
            tracing::debug!(service = %err.service, status = ?err.status, error = %err.message, "Backend call rejected");
        }

        ApiError::new(kind, code, message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::bad_request("INVALID_REQUEST", "Invalid request body")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected query string");
        ApiError::bad_request("INVALID_REQUEST", "Invalid query parameters")
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected multipart request");
        ApiError::bad_request("INVALID_REQUEST", "Expected a multipart/form-data body")
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        tracing::debug!(error = %err.body_text(), "Malformed multipart body");
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::bad_request("FILE_TOO_LARGE", "Request body too large");
        }
        ApiError::bad_request("INVALID_REQUEST", "Malformed multipart body")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            code: self.code.to_string(),
            message: self.message,
        });
        (self.kind.status_code(), body).into_response()
    }
}
