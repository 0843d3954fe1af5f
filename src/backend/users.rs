// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Users backend client: student and HR profiles.

use async_trait::async_trait;
use serde::Serialize;

use super::{
    error::BackendError,
    rpc::{Empty, RpcChannel},
};
use crate::models::{page_bounds, ProfileFilter, ProfilePage, ProfilePatch, ProfileRecord};

#[async_trait]
pub trait UsersBackend: Send + Sync {
    async fn create_profile(&self, profile: &ProfileRecord) -> Result<ProfileRecord, BackendError>;
    async fn get_profile(&self, id: &str) -> Result<ProfileRecord, BackendError>;
    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<ProfilePage, BackendError>;
    async fn update_profile(
        &self,
        id: &str,
        patch: &ProfilePatch,
    ) -> Result<ProfileRecord, BackendError>;
    async fn delete_profile(&self, id: &str) -> Result<(), BackendError>;

    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct RpcUsersClient {
    channel: RpcChannel,
}

impl RpcUsersClient {
    pub fn new(channel: RpcChannel) -> Self {
        Self { channel }
    }
}

#[derive(Serialize)]
struct IdRequest<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    id: &'a str,
    #[serde(flatten)]
    patch: &'a ProfilePatch,
}

#[derive(Serialize)]
struct ListRequest<'a> {
    page: u32,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
}

#[async_trait]
impl UsersBackend for RpcUsersClient {
    async fn create_profile(&self, profile: &ProfileRecord) -> Result<ProfileRecord, BackendError> {
        self.channel.call("CreateProfile", profile).await
    }

    async fn get_profile(&self, id: &str) -> Result<ProfileRecord, BackendError> {
        self.channel.call("GetProfile", &IdRequest { id }).await
    }

    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<ProfilePage, BackendError> {
        let (page, limit) = page_bounds(filter.page, filter.limit);
        let request = ListRequest {
            page,
            limit,
            category: filter.category.as_deref().filter(|c| !c.is_empty()),
        };
        self.channel.call("GetAllProfiles", &request).await
    }

    async fn update_profile(
        &self,
        id: &str,
        patch: &ProfilePatch,
    ) -> Result<ProfileRecord, BackendError> {
        self.channel
            .call("UpdateProfile", &UpdateRequest { id, patch })
            .await
    }

    async fn delete_profile(&self, id: &str) -> Result<(), BackendError> {
        let _: Empty = self.channel.call("DeleteProfile", &IdRequest { id }).await?;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.channel.is_enabled()
    }
}
