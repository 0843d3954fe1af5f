// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vacancy backend client.

use async_trait::async_trait;
use serde::Serialize;

use super::{
    error::BackendError,
    rpc::{Empty, RpcChannel},
};
use crate::models::{
    page_bounds, PositionList, VacancyDraft, VacancyFilter, VacancyPage, VacancyRecord,
};

#[async_trait]
pub trait VacancyBackend: Send + Sync {
    async fn create_vacancy(&self, draft: &VacancyDraft) -> Result<VacancyRecord, BackendError>;
    async fn get_vacancy(&self, id: &str) -> Result<VacancyRecord, BackendError>;
    /// Public listing.
    async fn list_vacancies(&self, filter: &VacancyFilter) -> Result<VacancyPage, BackendError>;
    /// Listing for HR, includes closed positions.
    async fn list_hr_vacancies(&self, filter: &VacancyFilter)
        -> Result<VacancyPage, BackendError>;
    async fn update_vacancy(
        &self,
        id: &str,
        draft: &VacancyDraft,
    ) -> Result<VacancyRecord, BackendError>;
    async fn delete_vacancy(&self, id: &str) -> Result<(), BackendError>;
    async fn positions(&self) -> Result<PositionList, BackendError>;

    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct RpcVacancyClient {
    channel: RpcChannel,
}

impl RpcVacancyClient {
    pub fn new(channel: RpcChannel) -> Self {
        Self { channel }
    }

    async fn list(&self, method: &str, filter: &VacancyFilter) -> Result<VacancyPage, BackendError> {
        let (page, limit) = page_bounds(filter.page, filter.limit);
        let request = VacancyFilter {
            page: Some(page),
            limit: Some(limit),
            ..filter.clone()
        };
        self.channel.call(method, &request).await
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
    draft: &'a VacancyDraft,
}

#[async_trait]
impl VacancyBackend for RpcVacancyClient {
    async fn create_vacancy(&self, draft: &VacancyDraft) -> Result<VacancyRecord, BackendError> {
        self.channel.call("NewVacancy", draft).await
    }

    async fn get_vacancy(&self, id: &str) -> Result<VacancyRecord, BackendError> {
        self.channel.call("GetVacancy", &IdRequest { id }).await
    }

    async fn list_vacancies(&self, filter: &VacancyFilter) -> Result<VacancyPage, BackendError> {
        self.list("GetAllVacancies", filter).await
    }

    async fn list_hr_vacancies(
        &self,
        filter: &VacancyFilter,
    ) -> Result<VacancyPage, BackendError> {
        self.list("GetHRVacancies", filter).await
    }

    async fn update_vacancy(
        &self,
        id: &str,
        draft: &VacancyDraft,
    ) -> Result<VacancyRecord, BackendError> {
        self.channel
            .call("UpdateVacancy", &UpdateRequest { id, draft })
            .await
    }

    async fn delete_vacancy(&self, id: &str) -> Result<(), BackendError> {
        let _: Empty = self.channel.call("DeleteVacancy", &IdRequest { id }).await?;
        Ok(())
    }

    async fn positions(&self) -> Result<PositionList, BackendError> {
        self.channel.call("GetAllPositions", &Empty {}).await
    }

    fn is_enabled(&self) -> bool {
        self.channel.is_enabled()
    }
}
