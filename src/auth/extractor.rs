// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated actor.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(actor): Auth) -> impl IntoResponse {
//!     // actor.id, actor.role
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{Actor, AuthError};

/// The actor placed in the request extensions by the authentication layer.
pub struct Auth(pub Actor);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::NotAuthenticated)
    }
}
