// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential resolution against the auth backend.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};

use super::{Actor, AuthError, Role};
use crate::backend::{AuthBackend, BackendStatus};

/// Routes reachable without a credential. Listed explicitly, never inferred.
pub const PUBLIC_ROUTES: &[(&str, &str)] = &[
    ("POST", "/api/v1/auth/login"),
    ("POST", "/api/v1/auth/register"),
];

pub fn is_public_route(method: &Method, path: &str) -> bool {
    PUBLIC_ROUTES
        .iter()
        .any(|(m, p)| *m == method.as_str() && *p == path)
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Turns an authorization header into an [`Actor`].
#[derive(Clone)]
pub struct IdentityResolver {
    auth: Arc<dyn AuthBackend>,
}

impl IdentityResolver {
    pub fn new(auth: Arc<dyn AuthBackend>) -> Self {
        Self { auth }
    }

    /// Header syntax is checked before the auth backend is contacted.
    pub async fn resolve(&self, header: Option<&HeaderValue>) -> Result<Actor, AuthError> {
        let token = bearer_token(header)?;

        let info = match self.auth.parse_token(token).await {
            Ok(info) => info,
            Err(e) if e.status == BackendStatus::Unauthenticated => {
                return Err(AuthError::InvalidToken)
            }
            Err(e) => {
                tracing::error!(status = ?e.status, error = %e.message, "Token validation failed");
                return Err(AuthError::ServiceUnavailable);
            }
        };

        if !info.valid || info.user_uuid.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let role = Role::try_from(info.role).map_err(|_| {
            tracing::warn!(user_id = %info.user_uuid, role = ?info.role, "Token carries unknown role");
            AuthError::UnknownRole
        })?;

        Ok(Actor::new(info.user_uuid, role, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::WireRole;
    use crate::backend::fake::FakeAuth;

    fn resolver() -> (Arc<FakeAuth>, IdentityResolver) {
        let auth = Arc::new(FakeAuth::default());
        (auth.clone(), IdentityResolver::new(auth))
    }

    #[tokio::test]
    async fn missing_header_is_rejected_without_backend_call() {
        let (auth, resolver) = resolver();
        assert_eq!(
            resolver.resolve(None).await,
            Err(AuthError::MissingAuthHeader)
        );
        assert_eq!(auth.parse_count(), 0);
    }

    #[tokio::test]
    async fn missing_bearer_prefix_is_rejected_without_backend_call() {
        let (auth, resolver) = resolver();
        auth.issue_token("sometoken", "u-1", WireRole::Student);

        let header = HeaderValue::from_static("sometoken");
        let err = resolver.resolve(Some(&header)).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidAuthHeader);
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(auth.parse_count(), 0);
    }

    #[tokio::test]
    async fn empty_bearer_token_is_malformed() {
        let (auth, resolver) = resolver();
        let header = HeaderValue::from_static("Bearer   ");
        assert_eq!(
            resolver.resolve(Some(&header)).await,
            Err(AuthError::InvalidAuthHeader)
        );
        assert_eq!(auth.parse_count(), 0);
    }

    #[tokio::test]
    async fn valid_token_resolves_actor() {
        let (auth, resolver) = resolver();
        auth.issue_token("tok-1", "u-1", WireRole::Employer);

        let header = HeaderValue::from_static("Bearer tok-1");
        let actor = resolver.resolve(Some(&header)).await.unwrap();
        assert_eq!(actor, Actor::new("u-1", Role::Employer, "tok-1"));
        assert_eq!(auth.parse_count(), 1);
    }

    #[tokio::test]
    async fn every_role_survives_resolution() {
        let (auth, resolver) = resolver();
        for (i, role) in crate::auth::ALL_ROLES.iter().enumerate() {
            let token = format!("tok-{i}");
            auth.issue_token(&token, "u-1", WireRole::from(*role));
            let header = HeaderValue::from_str(&format!("Bearer {token}")).unwrap();
            assert_eq!(resolver.resolve(Some(&header)).await.unwrap().role, *role);
        }
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let (_, resolver) = resolver();
        let header = HeaderValue::from_static("Bearer nope");
        assert_eq!(
            resolver.resolve(Some(&header)).await,
            Err(AuthError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn unspecified_role_is_unauthenticated() {
        let (auth, resolver) = resolver();
        auth.issue_token("tok", "u-1", WireRole::Unspecified);
        let header = HeaderValue::from_static("Bearer tok");
        assert_eq!(
            resolver.resolve(Some(&header)).await,
            Err(AuthError::UnknownRole)
        );
    }

    #[tokio::test]
    async fn backend_rejection_and_outage_are_distinct() {
        let (auth, resolver) = resolver();
        let header = HeaderValue::from_static("Bearer tok");

        *auth.fail_parse.lock().unwrap() = Some(BackendStatus::Unauthenticated);
        assert_eq!(
            resolver.resolve(Some(&header)).await,
            Err(AuthError::InvalidToken)
        );

        *auth.fail_parse.lock().unwrap() = Some(BackendStatus::Unavailable);
        assert_eq!(
            resolver.resolve(Some(&header)).await,
            Err(AuthError::ServiceUnavailable)
        );
    }

    #[test]
    fn only_login_and_register_are_public() {
        assert!(is_public_route(&Method::POST, "/api/v1/auth/login"));
        assert!(is_public_route(&Method::POST, "/api/v1/auth/register"));
        assert!(!is_public_route(&Method::GET, "/api/v1/auth/login"));
        assert!(!is_public_route(&Method::POST, "/api/v1/auth/logout"));
        assert!(!is_public_route(&Method::GET, "/api/v1/users"));
    }
}
