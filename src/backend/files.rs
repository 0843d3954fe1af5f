// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Achievement/file backend client and the presigned upload transfer.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::Client;
use serde::Serialize;

use super::{
    error::BackendError,
    rpc::{Empty, RpcChannel},
};
use crate::models::{DownloadUrl, FileMeta, FileMetaList, UploadTicket};

/// Parameters for requesting an upload slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
    pub user_uuid: String,
    pub achievement_name: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
}

#[async_trait]
pub trait FileBackend: Send + Sync {
    async fn list_files(&self, entity_id: &str) -> Result<Vec<FileMeta>, BackendError>;
    async fn download_url(&self, entity_id: &str, file_key: &str)
        -> Result<DownloadUrl, BackendError>;
    async fn upload_url(&self, request: &UploadRequest) -> Result<UploadTicket, BackendError>;
    /// Record metadata for an object already transferred to `storage_key`.
    async fn confirm(&self, meta: &FileMeta, storage_key: &str) -> Result<(), BackendError>;
    async fn delete_file(&self, entity_id: &str, file_key: &str) -> Result<(), BackendError>;

    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct RpcFileClient {
    channel: RpcChannel,
}

impl RpcFileClient {
    pub fn new(channel: RpcChannel) -> Self {
        Self { channel }
    }
}

#[derive(Serialize)]
struct EntityRequest<'a> {
    user_uuid: &'a str,
}

#[derive(Serialize)]
struct FileRequest<'a> {
    user_uuid: &'a str,
    achievement_name: &'a str,
}

#[derive(Serialize)]
struct ConfirmRequest<'a> {
    meta: &'a FileMeta,
    s3_key: &'a str,
}

#[async_trait]
impl FileBackend for RpcFileClient {
    async fn list_files(&self, entity_id: &str) -> Result<Vec<FileMeta>, BackendError> {
        let list: FileMetaList = self
            .channel
            .call(
                "GetAllAchievements",
                &EntityRequest {
                    user_uuid: entity_id,
                },
            )
            .await?;
        Ok(list.achievements)
    }

    async fn download_url(
        &self,
        entity_id: &str,
        file_key: &str,
    ) -> Result<DownloadUrl, BackendError> {
        self.channel
            .call(
                "GetAchievementDownloadUrl",
                &FileRequest {
                    user_uuid: entity_id,
                    achievement_name: file_key,
                },
            )
            .await
    }

    async fn upload_url(&self, request: &UploadRequest) -> Result<UploadTicket, BackendError> {
        self.channel.call("GetAchievementUploadUrl", request).await
    }

    async fn confirm(&self, meta: &FileMeta, storage_key: &str) -> Result<(), BackendError> {
        let _: Empty = self
            .channel
            .call(
                "AddAchievementMeta",
                &ConfirmRequest {
                    meta,
                    s3_key: storage_key,
                },
            )
            .await?;
        Ok(())
    }

    async fn delete_file(&self, entity_id: &str, file_key: &str) -> Result<(), BackendError> {
        let _: Empty = self
            .channel
            .call(
                "DeleteAchievement",
                &FileRequest {
                    user_uuid: entity_id,
                    achievement_name: file_key,
                },
            )
            .await?;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.channel.is_enabled()
    }
}

/// Failure while moving bytes to object storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("object upload failed: {0}")]
pub struct TransferError(pub String);

/// Moves file bytes to a presigned upload URL.
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    async fn put(&self, url: &str, content_type: &str, bytes: Bytes) -> Result<(), TransferError>;
}

#[derive(Debug, Clone)]
pub struct HttpObjectUploader {
    http: Client,
}

impl HttpObjectUploader {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ObjectUploader for HttpObjectUploader {
    async fn put(&self, url: &str, content_type: &str, bytes: Bytes) -> Result<(), TransferError> {
        let response = self
            .http
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| TransferError(format!("PUT failed: {e}")))?;

        if !response.status().is_success() {
            return Err(TransferError(format!(
                "PUT returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
