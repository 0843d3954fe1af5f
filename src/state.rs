// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::{
    auth::IdentityResolver, backend::BackendClientSet, orchestration::enrich::FileEnricher,
};

/// Shared, read-only handler state. Cloning is cheap: every member is an
/// `Arc` underneath.
#[derive(Clone)]
pub struct AppState {
    pub backends: BackendClientSet,
    pub resolver: IdentityResolver,
    pub enricher: FileEnricher,
}

impl AppState {
    /// `public_prefix` is the path prefix used for synthesized direct file URLs.
    pub fn new(backends: BackendClientSet, public_prefix: &str) -> Self {
        Self {
            resolver: IdentityResolver::new(backends.auth.clone()),
            enricher: FileEnricher::new(backends.files.clone(), public_prefix),
            backends,
        }
    }
}
