// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Backend Clients
//!
//! One typed client per backend, all sharing the [`RpcChannel`] transport.
//! Clients sit behind traits so handlers and orchestration code can be
//! exercised against in-memory fakes.
//!
//! A backend without a configured address is disabled: the gateway still
//! starts, and calls to that backend fail fast with `Unavailable`.

use std::sync::Arc;

use crate::config::{ConfigError, GatewayConfig};

pub mod auth;
pub mod company;
pub mod error;
pub mod files;
pub mod rpc;
pub mod users;
pub mod vacancy;

#[cfg(test)]
pub mod fake;

pub use auth::{AuthBackend, Credentials, RpcAuthClient, Session, TokenInfo};
pub use company::{CompanyBackend, RpcCompanyClient};
pub use error::{BackendError, BackendStatus, Service};
pub use files::{
    FileBackend, HttpObjectUploader, ObjectUploader, RpcFileClient, TransferError, UploadRequest,
};
pub use rpc::RpcChannel;
pub use users::{RpcUsersClient, UsersBackend};
pub use vacancy::{RpcVacancyClient, VacancyBackend};

/// Process-wide set of backend clients, shared read-only by all requests.
#[derive(Clone)]
pub struct BackendClientSet {
    pub auth: Arc<dyn AuthBackend>,
    pub users: Arc<dyn UsersBackend>,
    pub companies: Arc<dyn CompanyBackend>,
    pub vacancies: Arc<dyn VacancyBackend>,
    pub files: Arc<dyn FileBackend>,
    pub uploader: Arc<dyn ObjectUploader>,
}

impl BackendClientSet {
    /// Build every client from configuration. Unset addresses produce
    /// disabled channels rather than an error.
    pub fn connect(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let channel = |service: Service| -> Result<RpcChannel, ConfigError> {
            match config.backends.address(service) {
                Some(base) => {
                    tracing::info!(service = %service, address = %base, "Backend enabled");
                    RpcChannel::connect(service, base.clone(), config.backend_timeout)
                        .map_err(|e| ConfigError::HttpClient(e.to_string()))
                }
                None => {
                    tracing::warn!(service = %service, "Backend address not set, calls will fail fast");
                    Ok(RpcChannel::disabled(service))
                }
            }
        };

        let uploader = HttpObjectUploader::new(config.upload_timeout)
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            auth: Arc::new(RpcAuthClient::new(channel(Service::Auth)?)),
            users: Arc::new(RpcUsersClient::new(channel(Service::Users)?)),
            companies: Arc::new(RpcCompanyClient::new(channel(Service::Company)?)),
            vacancies: Arc::new(RpcVacancyClient::new(channel(Service::Vacancy)?)),
            files: Arc::new(RpcFileClient::new(channel(Service::Achievement)?)),
            uploader: Arc::new(uploader),
        })
    }

    /// Whether each backend has an address.
    pub fn availability(&self) -> [(Service, bool); 5] {
        [
            (Service::Auth, self.auth.is_enabled()),
            (Service::Users, self.users.is_enabled()),
            (Service::Company, self.companies.is_enabled()),
            (Service::Vacancy, self.vacancies.is_enabled()),
            (Service::Achievement, self.files.is_enabled()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn unset_addresses_yield_disabled_clients() {
        let env: HashMap<&str, &str> = HashMap::from([("AUTH_SERVICE_ADDR", "auth:50051")]);
        let config = GatewayConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        let set = BackendClientSet::connect(&config).unwrap();

        let availability = set.availability();
        assert_eq!(availability[0], (Service::Auth, true));
        assert!(availability[1..].iter().all(|(_, enabled)| !enabled));

        let err = set.users.get_profile("u-1").await.unwrap_err();
        assert_eq!(err.status, BackendStatus::Unavailable);
        assert_eq!(err.service, Service::Users);
    }
}
