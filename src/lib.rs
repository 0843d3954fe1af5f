// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! StudJobs Gateway - REST front door for the student job platform
//!
//! Authenticates callers against the auth backend, enforces per-route role
//! policy and fans requests out to the users, company, vacancy and
//! achievement backends.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Identity resolution and guard chains
//! - `backend` - Typed clients for the backend services
//! - `orchestration` - File enrichment, concurrent fetches, compensating writes

pub mod api;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod state;
