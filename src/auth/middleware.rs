// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization middleware.
//!
//! Two layers cooperate:
//!
//! - [`authenticate`] wraps the whole API. It resolves the bearer credential
//!   into an [`Actor`] and stores it in the request extensions. Public routes
//!   pass through untouched.
//! - [`require`] is attached per route with `route_layer`. It evaluates the
//!   route's guard chain against the actor and the matched path parameters
//!   before the handler runs.

use std::{
    convert::Infallible,
    task::{Context, Poll},
};

use axum::{
    extract::{FromRequestParts, RawPathParams, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use tower::{Layer, Service};

use super::{
    policy::{evaluate, Decision, Guard},
    resolver::is_public_route,
    Actor, AuthError,
};
use crate::state::AppState;

/// Resolve the caller for every non-public route.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if is_public_route(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    match state
        .resolver
        .resolve(request.headers().get(AUTHORIZATION))
        .await
    {
        Ok(actor) => {
            tracing::debug!(user_id = %actor.id, role = %actor.role, "Request authenticated");
            request.extensions_mut().insert(actor);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(path = %request.uri().path(), error = %err, "Request rejected");
            err.into_response()
        }
    }
}

/// Attach a guard chain to a route.
pub fn require(chain: &'static [Guard]) -> RequireLayer {
    RequireLayer { chain }
}

#[derive(Debug, Clone, Copy)]
pub struct RequireLayer {
    chain: &'static [Guard],
}

impl<S> Layer<S> for RequireLayer {
    type Service = Require<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Require {
            inner,
            chain: self.chain,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Require<S> {
    inner: S,
    chain: &'static [Guard],
}

impl<S> Service<Request> for Require<S>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // The clone is not necessarily ready; keep the one that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let chain = self.chain;

        Box::pin(async move {
            let (mut parts, body) = request.into_parts();
            let params: Vec<(String, String)> =
                match RawPathParams::from_request_parts(&mut parts, &()).await {
                    Ok(raw) => raw
                        .iter()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect(),
                    Err(_) => Vec::new(),
                };

            let actor = parts.extensions.get::<Actor>();
            match evaluate(chain, actor, &params) {
                Decision::Allow => inner.call(Request::from_parts(parts, body)).await,
                Decision::Unauthenticated => Ok(AuthError::NotAuthenticated.into_response()),
                Decision::Deny => {
                    tracing::warn!(
                        user_id = actor.map(|a| a.id.as_str()).unwrap_or_default(),
                        path = %parts.uri.path(),
                        "Access denied"
                    );
                    Ok(AuthError::InsufficientPermissions.into_response())
                }
            }
        })
    }
}
