// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Developer` - Superuser, passes every guard
/// - `Student` - Job seeker, owns a profile and achievements
/// - `Employer` - HR member, manages vacancies and browses students
/// - `CompanyOwner` - Owns a company record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "ROLE_DEVELOPER")]
    Developer,
    #[serde(rename = "ROLE_STUDENT")]
    Student,
    #[serde(rename = "ROLE_EMPLOYER")]
    Employer,
    #[serde(rename = "ROLE_COMPANY_OWNER")]
    CompanyOwner,
}

/// Every role the gateway knows about.
pub const ALL_ROLES: &[Role] = &[
    Role::Developer,
    Role::Student,
    Role::Employer,
    Role::CompanyOwner,
];

impl Role {
    /// Client-facing role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "ROLE_DEVELOPER",
            Role::Student => "ROLE_STUDENT",
            Role::Employer => "ROLE_EMPLOYER",
            Role::CompanyOwner => "ROLE_COMPANY_OWNER",
        }
    }

    /// Developers satisfy every authorization check.
    pub fn is_superuser(&self) -> bool {
        matches!(self, Role::Developer)
    }
}

/// Returned when a role string or wire value does not name one of the four roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role")]
pub struct UnknownRole;

impl FromStr for Role {
    type Err = UnknownRole;

    /// Exact match only. There is no fallback role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_DEVELOPER" => Ok(Role::Developer),
            "ROLE_STUDENT" => Ok(Role::Student),
            "ROLE_EMPLOYER" => Ok(Role::Employer),
            "ROLE_COMPANY_OWNER" => Ok(Role::CompanyOwner),
            _ => Err(UnknownRole),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role as exchanged with the auth backend.
///
/// `Unspecified` absorbs the zero value and anything this gateway does not
/// recognise. It never becomes an [`Actor`](super::Actor) role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WireRole {
    #[serde(rename = "ROLE_DEVELOPER")]
    Developer,
    #[serde(rename = "ROLE_STUDENT")]
    Student,
    #[serde(rename = "ROLE_EMPLOYER")]
    Employer,
    #[serde(rename = "ROLE_COMPANY_OWNER")]
    CompanyOwner,
    // serde requires the catch-all to be the last variant.
    #[default]
    #[serde(rename = "ROLE_UNSPECIFIED", other)]
    Unspecified,
}

impl From<Role> for WireRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Developer => WireRole::Developer,
            Role::Student => WireRole::Student,
            Role::Employer => WireRole::Employer,
            Role::CompanyOwner => WireRole::CompanyOwner,
        }
    }
}

impl TryFrom<WireRole> for Role {
    type Error = UnknownRole;

    fn try_from(wire: WireRole) -> Result<Self, Self::Error> {
        match wire {
            WireRole::Developer => Ok(Role::Developer),
            WireRole::Student => Ok(Role::Student),
            WireRole::Employer => Ok(Role::Employer),
            WireRole::CompanyOwner => Ok(Role::CompanyOwner),
            WireRole::Unspecified => Err(UnknownRole),
        }
    }
}
