// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization decisions.
//!
//! Every protected route carries a chain of [`Guard`]s. The chain is plain
//! data: [`evaluate`] walks it in order and the first non-`Allow` decision
//! wins. Handlers never run after a `Deny`.

use super::{Actor, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    Unauthenticated,
}

/// Role-only check. Ownership plays no part here.
pub fn authorize_roles(actor: &Actor, allowed: &[Role]) -> Decision {
    authorize(actor, allowed, None)
}

/// Owner-or-role check.
///
/// 1. developers are always allowed
/// 2. the owner named by `owner_id` is allowed
/// 3. members of `allowed` are allowed
/// 4. everyone else is denied
pub fn authorize(actor: &Actor, allowed: &[Role], owner_id: Option<&str>) -> Decision {
    if actor.role.is_superuser() {
        return Decision::Allow;
    }
    if owner_id.is_some_and(|owner| actor.owns(owner)) {
        return Decision::Allow;
    }
    if allowed.contains(&actor.role) {
        return Decision::Allow;
    }
    Decision::Deny
}

/// One step of a route's authorization chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any resolved actor.
    Authenticated,
    /// Role-only check.
    Roles(&'static [Role]),
    /// Owner-or-role check; the owner id is the path parameter `param`.
    OwnerOrRoles {
        param: &'static str,
        roles: &'static [Role],
    },
}

impl Guard {
    fn check(&self, actor: &Actor, path_params: &[(String, String)]) -> Decision {
        match self {
            Guard::Authenticated => Decision::Allow,
            Guard::Roles(roles) => authorize_roles(actor, roles),
            Guard::OwnerOrRoles { param, roles } => {
                let owner = path_params
                    .iter()
                    .find(|(name, _)| name == param)
                    .map(|(_, value)| value.as_str());
                authorize(actor, roles, owner)
            }
        }
    }
}

/// Run `chain` for `actor`. A missing actor is reported before any role or
/// ownership logic runs.
pub fn evaluate(
    chain: &[Guard],
    actor: Option<&Actor>,
    path_params: &[(String, String)],
) -> Decision {
    let Some(actor) = actor else {
        return Decision::Unauthenticated;
    };

    chain
        .iter()
        .map(|guard| guard.check(actor, path_params))
        .find(|decision| *decision != Decision::Allow)
        .unwrap_or(Decision::Allow)
}
