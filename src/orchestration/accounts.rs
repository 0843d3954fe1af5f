// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account lifecycle writes that span the auth backend and an entity
//! backend.

use super::compensation::{inverse, CompensableSequence};
use crate::auth::{Role, WireRole};
use crate::backend::{BackendClientSet, BackendError, Credentials, Session};
use crate::models::{CompanyRecord, ProfileRecord};

/// Age stored on a freshly created profile until the user edits it.
pub const DEFAULT_PROFILE_AGE: i32 = 18;

/// Create the credential, then the profile (or company for owners).
///
/// A failed second step deletes the credential again and returns the
/// second step's error.
pub async fn register_account(
    backends: &BackendClientSet,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Session, BackendError> {
    let credentials = Credentials {
        email: email.to_string(),
        password: password.to_string(),
        role: WireRole::from(role),
    };

    let mut seq = CompensableSequence::new("registration");
    let auth = backends.auth.clone();

    let session = seq
        .step(
            "create_credential",
            backends.auth.sign_up(&credentials),
            |session| {
                let auth = auth.clone();
                let user_id = session.user_uuid.clone();
                inverse(move || async move { auth.delete_user(&user_id).await })
            },
        )
        .await?;

    match role {
        Role::CompanyOwner => {
            let company = CompanyRecord {
                id: session.user_uuid.clone(),
                ..Default::default()
            };
            seq.step(
                "create_company",
                backends.companies.create_company(&company),
                |_| None,
            )
            .await?;
        }
        Role::Developer | Role::Student | Role::Employer => {
            let profile = ProfileRecord {
                id: session.user_uuid.clone(),
                email: email.to_string(),
                age: DEFAULT_PROFILE_AGE,
                ..Default::default()
            };
            seq.step(
                "create_profile",
                backends.users.create_profile(&profile),
                |_| None,
            )
            .await?;
        }
    }

    tracing::info!(user_id = %session.user_uuid, role = role.as_str(), "Account registered");
    Ok(session)
}

/// Which record owns the account's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Profile,
    Company,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    /// The account data is gone but the credential survived.
    DeletedWithWarning(String),
}

pub const CREDENTIAL_LEFT_WARNING: &str =
    "Account data deleted, but the sign-in credential could not be removed";

/// Delete the account's data, then its credential.
///
/// A record that is already gone is treated as deleted so that a retried
/// deletion can still remove the credential.
pub async fn delete_account(
    backends: &BackendClientSet,
    kind: AccountKind,
    user_id: &str,
) -> Result<DeletionOutcome, BackendError> {
    let primary = match kind {
        AccountKind::Profile => backends.users.delete_profile(user_id).await,
        AccountKind::Company => delete_company(backends, user_id).await,
    };
    match primary {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            tracing::debug!(user_id, ?kind, "Account data already gone");
        }
        Err(e) => return Err(e),
    }

    match backends.auth.delete_user(user_id).await {
        Ok(()) => Ok(DeletionOutcome::Deleted),
        Err(e) if e.is_not_found() => Ok(DeletionOutcome::Deleted),
        Err(e) => {
            tracing::warn!(user_id, ?kind, error = %e, "Credential deletion failed after data deletion");
            Ok(DeletionOutcome::DeletedWithWarning(
                CREDENTIAL_LEFT_WARNING.to_string(),
            ))
        }
    }
}

async fn delete_company(backends: &BackendClientSet, company_id: &str) -> Result<(), BackendError> {
    let company = backends.companies.get_company(company_id).await?;

    if !company.logo_id.is_empty() {
        if let Err(e) = backends
            .files
            .delete_file(company_id, &company.logo_id)
            .await
        {
            if !e.is_not_found() {
                tracing::warn!(company_id, logo_id = %company.logo_id, error = %e, "Logo deletion failed");
            }
        }
    }

    backends.companies.delete_company(company_id).await
}
