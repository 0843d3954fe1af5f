// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_SERVICE_ADDR` | Auth backend address | unset (disabled) |
//! | `USERS_SERVICE_ADDR` | Users backend address | unset (disabled) |
//! | `COMPANY_SERVICE_ADDR` | Company backend address | unset (disabled) |
//! | `VACANCY_SERVICE_ADDR` | Vacancy backend address | unset (disabled) |
//! | `ACHIEVEMENT_SERVICE_ADDR` | Achievement/file backend address | unset (disabled) |
//! | `BACKEND_TIMEOUT_SECS` | Timeout applied to every backend call | `10` |
//! | `UPLOAD_TIMEOUT_SECS` | Timeout for byte transfers to object storage | `30` |
//! | `PUBLIC_PATH_PREFIX` | Prefix of synthesized direct file URLs | `/api/v1` |
//! | `TLS_CERT_PATH` | PEM certificate chain, enables HTTPS with `TLS_KEY_PATH` | unset |
//! | `TLS_KEY_PATH` | PEM private key | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use url::Url;

use crate::backend::Service;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const AUTH_SERVICE_ADDR_ENV: &str = "AUTH_SERVICE_ADDR";
pub const USERS_SERVICE_ADDR_ENV: &str = "USERS_SERVICE_ADDR";
pub const COMPANY_SERVICE_ADDR_ENV: &str = "COMPANY_SERVICE_ADDR";
pub const VACANCY_SERVICE_ADDR_ENV: &str = "VACANCY_SERVICE_ADDR";
pub const ACHIEVEMENT_SERVICE_ADDR_ENV: &str = "ACHIEVEMENT_SERVICE_ADDR";
pub const BACKEND_TIMEOUT_ENV: &str = "BACKEND_TIMEOUT_SECS";
pub const UPLOAD_TIMEOUT_ENV: &str = "UPLOAD_TIMEOUT_SECS";
pub const PUBLIC_PATH_PREFIX_ENV: &str = "PUBLIC_PATH_PREFIX";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PUBLIC_PATH_PREFIX: &str = "/api/v1";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid {expected}: {value}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Backend base URLs. `None` means the backend is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendAddresses {
    pub auth: Option<Url>,
    pub users: Option<Url>,
    pub company: Option<Url>,
    pub vacancy: Option<Url>,
    pub achievement: Option<Url>,
}

impl BackendAddresses {
    pub fn address(&self, service: Service) -> Option<&Url> {
        match service {
            Service::Auth => self.auth.as_ref(),
            Service::Users => self.users.as_ref(),
            Service::Company => self.company.as_ref(),
            Service::Vacancy => self.vacancy.as_ref(),
            Service::Achievement => self.achievement.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub backends: BackendAddresses,
    pub backend_timeout: Duration,
    pub upload_timeout: Duration,
    pub public_prefix: String,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                expected: "port",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };
        let ip = host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                expected: "IP address",
                value: host.clone(),
            })?;
        let bind_addr = SocketAddr::new(ip, port);

        let address = |name: &'static str| -> Result<Option<Url>, ConfigError> {
            get(name).map(|raw| parse_address(name, &raw)).transpose()
        };
        let backends = BackendAddresses {
            auth: address(AUTH_SERVICE_ADDR_ENV)?,
            users: address(USERS_SERVICE_ADDR_ENV)?,
            company: address(COMPANY_SERVICE_ADDR_ENV)?,
            vacancy: address(VACANCY_SERVICE_ADDR_ENV)?,
            achievement: address(ACHIEVEMENT_SERVICE_ADDR_ENV)?,
        };

        let seconds = |name: &'static str, default: u64| -> Result<Duration, ConfigError> {
            match get(name) {
                Some(raw) => match raw.parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                    _ => Err(ConfigError::Invalid {
                        name,
                        expected: "positive number of seconds",
                        value: raw,
                    }),
                },
                None => Ok(Duration::from_secs(default)),
            }
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            bind_addr,
            backends,
            backend_timeout: seconds(BACKEND_TIMEOUT_ENV, DEFAULT_BACKEND_TIMEOUT_SECS)?,
            upload_timeout: seconds(UPLOAD_TIMEOUT_ENV, DEFAULT_UPLOAD_TIMEOUT_SECS)?,
            public_prefix: get(PUBLIC_PATH_PREFIX_ENV)
                .map(|p| p.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PUBLIC_PATH_PREFIX.to_string()),
            tls,
            log_format,
        })
    }
}

/// Accepts `host:port` as well as full URLs.
fn parse_address(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    match Url::parse(&candidate) {
        Ok(url) if url.has_host() => Ok(url),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "backend address",
            value: raw.to_string(),
        }),
    }
}
