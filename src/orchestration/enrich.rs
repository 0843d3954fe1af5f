// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-link enrichment.
//!
//! Decoration data only: a failed lookup leaves the field empty and is
//! logged, it never fails the entity or the list it belongs to.

use std::sync::Arc;

use futures::future::join_all;

use crate::backend::{BackendError, FileBackend};
use crate::models::{Company, FileCategory, FileInfo, MimeClass, UserProfile, Vacancy};

/// An entity carrying file references that can be resolved into links.
pub trait Enrichable: Send {
    /// Owner id the file backend stores this entity's files under.
    fn entity_id(&self) -> &str;

    /// Non-empty file references, one per field.
    fn file_refs(&self) -> Vec<(FileCategory, String)>;

    fn attach(&mut self, category: FileCategory, info: FileInfo);
}

fn non_empty(category: FileCategory, id: &str) -> Option<(FileCategory, String)> {
    (!id.is_empty()).then(|| (category, id.to_string()))
}

impl Enrichable for UserProfile {
    fn entity_id(&self) -> &str {
        &self.profile.id
    }

    fn file_refs(&self) -> Vec<(FileCategory, String)> {
        [
            non_empty(FileCategory::Avatar, &self.profile.avatar_id),
            non_empty(FileCategory::Resume, &self.profile.resume_id),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn attach(&mut self, category: FileCategory, info: FileInfo) {
        match category {
            FileCategory::Avatar => self.avatar = Some(info),
            FileCategory::Resume => self.resume = Some(info),
            _ => {}
        }
    }
}

impl Enrichable for Company {
    fn entity_id(&self) -> &str {
        &self.company.id
    }

    fn file_refs(&self) -> Vec<(FileCategory, String)> {
        non_empty(FileCategory::Logo, &self.company.logo_id)
            .into_iter()
            .collect()
    }

    fn attach(&mut self, category: FileCategory, info: FileInfo) {
        if category == FileCategory::Logo {
            self.logo = Some(info);
        }
    }
}

impl Enrichable for Vacancy {
    fn entity_id(&self) -> &str {
        &self.vacancy.id
    }

    fn file_refs(&self) -> Vec<(FileCategory, String)> {
        non_empty(FileCategory::Attachment, &self.vacancy.attachment_id)
            .into_iter()
            .collect()
    }

    fn attach(&mut self, category: FileCategory, info: FileInfo) {
        if category == FileCategory::Attachment {
            self.attachment = Some(info);
        }
    }
}

/// Resolves file references through the file backend.
#[derive(Clone)]
pub struct FileEnricher {
    files: Arc<dyn FileBackend>,
    public_prefix: Arc<str>,
}

impl FileEnricher {
    pub fn new(files: Arc<dyn FileBackend>, public_prefix: &str) -> Self {
        Self {
            files,
            public_prefix: Arc::from(public_prefix.trim_end_matches('/')),
        }
    }

    /// Same-origin URL that redirects to a fresh presigned link.
    pub fn direct_url(&self, entity_id: &str, file_id: &str) -> String {
        format!("{}/files/{entity_id}/{file_id}", self.public_prefix)
    }

    /// Look up one file. Avatar and logo images also get a direct URL.
    pub async fn resolve(
        &self,
        entity_id: &str,
        file_id: &str,
        category: FileCategory,
    ) -> Result<FileInfo, BackendError> {
        let link = self.files.download_url(entity_id, file_id).await?;
        Ok(self.file_info(
            entity_id,
            file_id,
            category,
            link.url,
            link.content_type.as_deref(),
        ))
    }

    /// Describe a file that was just stored. A failed lookup yields an
    /// empty `url`; the direct URL and type come from the upload itself.
    pub async fn describe_stored(
        &self,
        entity_id: &str,
        file_id: &str,
        category: FileCategory,
        content_type: &str,
    ) -> FileInfo {
        match self.resolve(entity_id, file_id, category).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(
                    entity_id = %entity_id,
                    %category,
                    file_id = %file_id,
                    error = %e,
                    "Stored file lookup failed, returning link-less description"
                );
                self.file_info(entity_id, file_id, category, String::new(), Some(content_type))
            }
        }
    }

    fn file_info(
        &self,
        entity_id: &str,
        file_id: &str,
        category: FileCategory,
        url: String,
        content_type: Option<&str>,
    ) -> FileInfo {
        let mime_class = content_type
            .and_then(MimeClass::from_content_type)
            .unwrap_or_else(|| MimeClass::from_file_name(file_id));

        let direct_url = (category.is_direct_servable() && mime_class == MimeClass::Image)
            .then(|| self.direct_url(entity_id, file_id));

        FileInfo {
            name: file_id.to_string(),
            url,
            direct_url,
            mime_class,
            category,
        }
    }

    /// Populate every file field of `entity` that resolves.
    pub async fn enrich<T: Enrichable>(&self, entity: &mut T) {
        let entity_id = entity.entity_id().to_string();
        let refs = entity.file_refs();
        if refs.is_empty() {
            return;
        }

        let results = join_all(
            refs.iter()
                .map(|(category, file_id)| self.resolve(&entity_id, file_id, *category)),
        )
        .await;

        for ((category, file_id), result) in refs.into_iter().zip(results) {
            match result {
                Ok(info) => entity.attach(category, info),
                Err(e) => tracing::warn!(
                    entity_id = %entity_id,
                    category = %category,
                    file_id = %file_id,
                    error = %e,
                    "File lookup failed, leaving link empty"
                ),
            }
        }
    }

    /// Enrich a list concurrently. Output order is the input order.
    pub async fn enrich_all<T: Enrichable>(&self, entities: &mut [T]) {
        join_all(entities.iter_mut().map(|entity| self.enrich(entity))).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeFiles;
    use crate::models::{CompanyRecord, ProfileRecord, VacancyRecord};

    fn company(id: &str, logo_id: &str) -> Company {
        Company::from(CompanyRecord {
            id: id.into(),
            name: format!("Company {id}"),
            logo_id: logo_id.into(),
            ..Default::default()
        })
    }

    fn enricher(files: &Arc<FakeFiles>, prefix: &str) -> FileEnricher {
        FileEnricher::new(files.clone(), prefix)
    }

    #[tokio::test]
    async fn logo_image_gets_presigned_and_direct_url() {
        let files = Arc::new(FakeFiles::default());
        files.put_object("c-1", "logo-42", "image/png");

        let mut acme = company("c-1", "logo-42");
        enricher(&files, "").enrich(&mut acme).await;

        let logo = acme.logo.expect("logo resolved");
        assert_eq!(logo.mime_class, MimeClass::Image);
        assert_eq!(logo.url, "https://storage.test/c-1/logo-42?sig=abc");
        assert_eq!(logo.direct_url.as_deref(), Some("/files/c-1/logo-42"));
    }

    #[tokio::test]
    async fn direct_url_carries_configured_prefix() {
        let files = Arc::new(FakeFiles::default());
        files.put_object("c-1", "logo-42", "image/png");

        let mut acme = company("c-1", "logo-42");
        enricher(&files, "/api/v1/").enrich(&mut acme).await;
        assert_eq!(
            acme.logo.unwrap().direct_url.as_deref(),
            Some("/api/v1/files/c-1/logo-42")
        );
    }

    #[tokio::test]
    async fn document_attachment_gets_presigned_url_only() {
        let files = Arc::new(FakeFiles::default());
        files.put_object("v-1", "doc-1", "application/pdf");

        let mut vacancy = Vacancy::from(VacancyRecord {
            id: "v-1".into(),
            attachment_id: "doc-1".into(),
            ..Default::default()
        });
        enricher(&files, "/api/v1").enrich(&mut vacancy).await;

        let attachment = vacancy.attachment.expect("attachment resolved");
        assert_eq!(attachment.mime_class, MimeClass::Document);
        assert!(attachment.direct_url.is_none());
        assert!(!attachment.url.is_empty());
    }

    #[tokio::test]
    async fn resume_is_always_a_signed_link() {
        let files = Arc::new(FakeFiles::default());
        files.put_object("u-1", "resume.png", "image/png");
        files.put_object("u-1", "avatar.png", "image/png");

        let mut profile = UserProfile::from(ProfileRecord {
            id: "u-1".into(),
            avatar_id: "avatar.png".into(),
            resume_id: "resume.png".into(),
            ..Default::default()
        });
        enricher(&files, "/api/v1").enrich(&mut profile).await;

        assert!(profile.resume.unwrap().direct_url.is_none());
        assert_eq!(
            profile.avatar.unwrap().direct_url.as_deref(),
            Some("/api/v1/files/u-1/avatar.png")
        );
    }

    #[tokio::test]
    async fn extension_is_the_fallback_classifier() {
        let files = Arc::new(FakeFiles::default());
        files.put_object("c-1", "logo.webp", "");

        let info = enricher(&files, "")
            .resolve("c-1", "logo.webp", FileCategory::Logo)
            .await
            .unwrap();
        assert_eq!(info.mime_class, MimeClass::Image);
        assert!(info.direct_url.is_some());
    }

    #[tokio::test]
    async fn one_failed_lookup_leaves_only_that_field_empty() {
        let files = Arc::new(FakeFiles::default());
        files.put_object("c-1", "logo-1", "image/png");
        files.put_object("c-2", "logo-2", "image/png");
        files.put_object("c-3", "logo-3", "image/png");
        files.break_lookup("logo-2");

        let mut companies = vec![
            company("c-1", "logo-1"),
            company("c-2", "logo-2"),
            company("c-3", "logo-3"),
        ];
        enricher(&files, "").enrich_all(&mut companies).await;

        assert_eq!(companies.len(), 3);
        let ids: Vec<&str> = companies.iter().map(|c| c.company.id.as_str()).collect();
        assert_eq!(ids, ["c-1", "c-2", "c-3"]);
        assert!(companies[0].logo.is_some());
        assert!(companies[1].logo.is_none());
        assert!(companies[2].logo.is_some());
    }

    #[tokio::test]
    async fn stored_file_is_described_even_when_lookup_fails() {
        let files = Arc::new(FakeFiles::default());
        files.put_object("u-1", "avatar-1", "image/png");
        files.break_lookup("avatar-1");

        let info = enricher(&files, "/api/v1")
            .describe_stored("u-1", "avatar-1", FileCategory::Avatar, "image/png")
            .await;
        assert_eq!(info.name, "avatar-1");
        assert!(info.url.is_empty());
        assert_eq!(info.mime_class, MimeClass::Image);
        assert_eq!(info.direct_url.as_deref(), Some("/api/v1/files/u-1/avatar-1"));

        let info = enricher(&files, "/api/v1")
            .describe_stored("u-1", "cv-1", FileCategory::Resume, "application/pdf")
            .await;
        assert!(info.url.is_empty());
        assert_eq!(info.mime_class, MimeClass::Document);
        assert!(info.direct_url.is_none());
    }

    #[tokio::test]
    async fn missing_object_is_tolerated() {
        let files = Arc::new(FakeFiles::default());
        let mut acme = company("c-1", "gone");
        enricher(&files, "").enrich(&mut acme).await;
        assert!(acme.logo.is_none());
        assert_eq!(acme.company.logo_id, "gone");
    }

    #[tokio::test]
    async fn entities_without_files_cost_no_lookups() {
        let files = Arc::new(FakeFiles::default());
        let mut companies = vec![company("c-1", ""), company("c-2", "")];
        enricher(&files, "").enrich_all(&mut companies).await;
        assert_eq!(files.download_count(), 0);
    }
}
