// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Orchestration
//!
//! Everything that turns one request into several backend calls.
//!
//! - [`enrich`]: best-effort file links on profiles, companies, vacancies
//! - [`join`]: all-or-nothing fetch of two independent resources
//! - [`compensation`]: ordered writes with reverse-order undo
//! - [`accounts`]: registration and account deletion
//! - [`upload`]: direct file upload with confirmation

pub mod accounts;
pub mod compensation;
pub mod enrich;
pub mod join;
pub mod upload;

pub use accounts::{delete_account, register_account, AccountKind, DeletionOutcome};
pub use compensation::{inverse, CompensableSequence, Inverse};
pub use enrich::{Enrichable, FileEnricher};
pub use join::fetch_both;
pub use upload::{storage_key, upload_direct, DirectUpload, EntityKind, UploadError};
