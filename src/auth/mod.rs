// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Every request to the gateway goes through the same pipeline:
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`IdentityResolver`] asks the auth backend whether the token is valid
//!    and maps the returned role into [`Role`]
//! 3. The resulting [`Actor`] is stored in the request extensions
//! 4. The route's guard chain ([`policy`]) decides allow/deny
//! 5. Handlers read the actor through the [`Auth`] extractor
//!
//! ## Security
//!
//! - Only login and registration are public
//! - Malformed headers are rejected before any backend call
//! - Unknown roles are authentication failures, never a default role
//! - Denials never reveal which role would have been accepted

pub mod actor;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod policy;
pub mod resolver;
pub mod roles;

pub use actor::Actor;
pub use error::AuthError;
pub use extractor::Auth;
pub use policy::{authorize, authorize_roles, Decision, Guard};
pub use resolver::IdentityResolver;
pub use roles::{Role, UnknownRole, WireRole, ALL_ROLES};
