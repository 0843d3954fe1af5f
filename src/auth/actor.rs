// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request caller identity.

use super::roles::Role;

/// The caller behind a request, as resolved from its bearer credential.
///
/// Built by the authentication layer and stored in the request
/// extensions. It lives exactly as long as the request that carries it.
#[derive(Clone, PartialEq, Eq)]
pub struct Actor {
    /// User identifier assigned by the auth backend.
    pub id: String,
    pub role: Role,
    /// Raw bearer token as the caller presented it. Never logged.
    pub token: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role, token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            token: token.into(),
        }
    }

    /// True when this actor is the owner named by `owner_id`.
    pub fn owns(&self, owner_id: &str) -> bool {
        !owner_id.is_empty() && self.id == owner_id
    }
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let actor = Actor::new("u-1", Role::Student, "secret-token");
        let rendered = format!("{actor:?}");
        assert!(rendered.contains("u-1"));
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn empty_owner_never_matches() {
        let actor = Actor::new("", Role::Student, "t");
        assert!(!actor.owns(""));
        assert!(Actor::new("u-1", Role::Student, "t").owns("u-1"));
    }
}
