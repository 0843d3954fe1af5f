// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Company backend client.

use async_trait::async_trait;
use serde::Serialize;

use super::{
    error::BackendError,
    rpc::{Empty, RpcChannel},
};
use crate::models::{page_bounds, CompanyFilter, CompanyPage, CompanyPatch, CompanyRecord};

#[async_trait]
pub trait CompanyBackend: Send + Sync {
    async fn create_company(&self, company: &CompanyRecord) -> Result<CompanyRecord, BackendError>;
    async fn get_company(&self, id: &str) -> Result<CompanyRecord, BackendError>;
    async fn list_companies(&self, filter: &CompanyFilter) -> Result<CompanyPage, BackendError>;
    async fn update_company(
        &self,
        id: &str,
        patch: &CompanyPatch,
    ) -> Result<CompanyRecord, BackendError>;
    async fn delete_company(&self, id: &str) -> Result<(), BackendError>;

    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct RpcCompanyClient {
    channel: RpcChannel,
}

impl RpcCompanyClient {
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
    patch: &'a CompanyPatch,
}

#[derive(Serialize)]
struct ListRequest<'a> {
    page: u32,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    company_type: Option<&'a str>,
}

#[async_trait]
impl CompanyBackend for RpcCompanyClient {
    async fn create_company(&self, company: &CompanyRecord) -> Result<CompanyRecord, BackendError> {
        self.channel.call("CreateCompany", company).await
    }

    async fn get_company(&self, id: &str) -> Result<CompanyRecord, BackendError> {
        self.channel.call("GetCompany", &IdRequest { id }).await
    }

    async fn list_companies(&self, filter: &CompanyFilter) -> Result<CompanyPage, BackendError> {
        let (page, limit) = page_bounds(filter.page, filter.limit);
        let request = ListRequest {
            page,
            limit,
            city: filter.city.as_deref().filter(|c| !c.is_empty()),
            company_type: filter.company_type.as_deref().filter(|t| !t.is_empty()),
        };
        self.channel.call("GetAllCompanies", &request).await
    }

    async fn update_company(
        &self,
        id: &str,
        patch: &CompanyPatch,
    ) -> Result<CompanyRecord, BackendError> {
        self.channel
            .call("UpdateCompany", &UpdateRequest { id, patch })
            .await
    }

    async fn delete_company(&self, id: &str) -> Result<(), BackendError> {
        let _: Empty = self.channel.call("DeleteCompany", &IdRequest { id }).await?;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.channel.is_enabled()
    }
}
