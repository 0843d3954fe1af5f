// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth backend client: credentials, tokens, sessions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    error::BackendError,
    rpc::{Empty, RpcChannel},
};
use crate::auth::WireRole;

/// Email/password/role triple sent on login and sign-up.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub role: WireRole,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_uuid: String,
    #[serde(default)]
    pub role: WireRole,
}

/// Result of checking a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    pub valid: bool,
    #[serde(default)]
    pub user_uuid: String,
    #[serde(default)]
    pub role: WireRole,
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session, BackendError>;
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, BackendError>;
    async fn parse_token(&self, token: &str) -> Result<TokenInfo, BackendError>;
    /// Ends every session of `user_id`.
    async fn logout(&self, user_id: &str) -> Result<(), BackendError>;
    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError>;

    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct RpcAuthClient {
    channel: RpcChannel,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct UserIdRequest<'a> {
    user_uuid: &'a str,
}

impl RpcAuthClient {
    pub fn new(channel: RpcChannel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl AuthBackend for RpcAuthClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        self.channel.call("Login", credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        self.channel.call("SignUp", credentials).await
    }

    async fn parse_token(&self, token: &str) -> Result<TokenInfo, BackendError> {
        self.channel.call("ParseToken", &TokenRequest { token }).await
    }

    async fn logout(&self, user_id: &str) -> Result<(), BackendError> {
        let _: Empty = self
            .channel
            .call("Logout", &UserIdRequest { user_uuid: user_id })
            .await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        let _: Empty = self
            .channel
            .call("DeleteUser", &UserIdRequest { user_uuid: user_id })
            .await?;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.channel.is_enabled()
    }
}
