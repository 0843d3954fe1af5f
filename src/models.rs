// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API and the records
//! exchanged with the backends. Backend records are embedded into the
//! client-facing shapes with `#[serde(flatten)]`, which then add the
//! resolved file links.
//!
//! ## Model Categories
//!
//! - **Auth**: login/registration payloads
//! - **Profiles**: student and HR profiles
//! - **Companies**: company records
//! - **Vacancies**: job offers
//! - **Files**: achievements, upload tickets, resolved file links

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Clamp client paging input to `page >= 1`, `1 <= limit <= 100`.
pub fn page_bounds(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page = page.filter(|p| *p > 0).unwrap_or(1);
    let limit = limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .min(MAX_PAGE_LIMIT);
    (page, limit)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// =============================================================================
// Auth
// =============================================================================

/// Login and registration body. `role` is one of `ROLE_STUDENT`,
/// `ROLE_DEVELOPER`, `ROLE_EMPLOYER`, `ROLE_COMPANY_OWNER`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AuthRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user_uuid: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    /// Set when the main action succeeded but a follow-up step did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            warning: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationInfo {
    pub total: u32,
    pub pages: u32,
    pub current_page: u32,
}

// =============================================================================
// Files
// =============================================================================

/// What a file is attached as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Avatar,
    Resume,
    Logo,
    Document,
    Attachment,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Avatar => "avatar",
            FileCategory::Resume => "resume",
            FileCategory::Logo => "logo",
            FileCategory::Document => "document",
            FileCategory::Attachment => "attachment",
        }
    }

    /// Categories an image may be served from a same-origin URL for.
    pub fn is_direct_servable(&self) -> bool {
        matches!(self, FileCategory::Avatar | FileCategory::Logo)
    }

    /// Upload size ceiling in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        match self {
            FileCategory::Avatar | FileCategory::Logo => 5 * 1024 * 1024,
            FileCategory::Resume | FileCategory::Document | FileCategory::Attachment => {
                10 * 1024 * 1024
            }
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MimeClass {
    Image,
    Document,
    Other,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "rtf"];

impl MimeClass {
    /// Classify by the content type a backend reported.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence.is_empty() {
            return None;
        }
        if essence.starts_with("image/") {
            return Some(MimeClass::Image);
        }
        let is_document = essence.starts_with("text/")
            || essence == "application/pdf"
            || essence == "application/msword"
            || essence == "application/rtf"
            || essence.contains("officedocument");
        Some(if is_document {
            MimeClass::Document
        } else {
            MimeClass::Other
        })
    }

    /// Classify by file extension.
    pub fn from_file_name(name: &str) -> Self {
        let Some(ext) = file_extension(name) else {
            return MimeClass::Other;
        };
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MimeClass::Image
        } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            MimeClass::Document
        } else {
            MimeClass::Other
        }
    }
}

/// Lowercased extension without the dot.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// A resolved file link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FileInfo {
    pub name: String,
    /// Temporary presigned URL.
    pub url: String,
    /// Same-origin redirect URL, only for avatar and logo images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_url: Option<String>,
    #[serde(rename = "type")]
    pub mime_class: MimeClass,
    pub category: FileCategory,
}

impl FileInfo {
    /// The URL a client should use: the direct one when available.
    pub fn preferred_url(&self) -> &str {
        self.direct_url.as_deref().unwrap_or(&self.url)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileUploadResponse {
    pub file_info: FileInfo,
    pub message: String,
}

/// Metadata stored alongside an uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileMeta {
    pub name: String,
    pub user_uuid: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileMetaList {
    #[serde(default)]
    pub achievements: Vec<FileMeta>,
}

/// Download link returned by the file backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DownloadUrl {
    pub url: String,
    #[serde(default)]
    pub expires_at: i64,
    /// Content type recorded for the object, when the backend knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Upload slot returned by the file backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadTicket {
    pub upload_url: String,
    pub s3_key: String,
    #[serde(default)]
    pub expires_at: i64,
}

/// Body of `POST /user/achievements`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AchievementUploadRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
}

impl AchievementUploadRequest {
    pub fn missing_field(&self) -> Option<&'static str> {
        if is_blank(&self.name) {
            Some("name")
        } else if is_blank(&self.file_name) {
            Some("file_name")
        } else if is_blank(&self.file_type) {
            Some("file_type")
        } else if self.file_size == 0 {
            Some("file_size")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AchievementUploadResponse {
    pub meta: FileMeta,
    pub upload: UploadTicket,
}

/// Body of `POST /user/achievements/{id}/confirm`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConfirmUploadRequest {
    pub s3_key: String,
    pub meta: FileMeta,
}

// =============================================================================
// Profiles
// =============================================================================

/// Profile as stored by the users backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProfileRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub tg: String,
    pub email: String,
    pub description: String,
    pub profession_category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub avatar_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resume_id: String,
}

/// Partial profile update. Absent fields are left unchanged, an empty file
/// id clears the link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<String>,
}

/// Profile with resolved file links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserProfile {
    #[serde(flatten)]
    pub profile: ProfileRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<FileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<FileInfo>,
}

impl From<ProfileRecord> for UserProfile {
    fn from(profile: ProfileRecord) -> Self {
        Self {
            profile,
            avatar: None,
            resume: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfilePage {
    #[serde(default)]
    pub profiles: Vec<ProfileRecord>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserList {
    pub profiles: Vec<UserProfile>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Profession category filter.
    pub category: Option<String>,
}

/// A user's profile and achievements, fetched together.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Portfolio {
    pub profile: UserProfile,
    pub achievements: Vec<FileMeta>,
}

// =============================================================================
// Companies
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CompanyRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub city: String,
    pub site: String,
    #[serde(rename = "type")]
    pub company_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub logo_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Company {
    #[serde(flatten)]
    pub company: CompanyRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<FileInfo>,
}

impl From<CompanyRecord> for Company {
    fn from(company: CompanyRecord) -> Self {
        Self {
            company,
            logo: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CompanyPage {
    #[serde(default)]
    pub companies: Vec<CompanyRecord>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompanyList {
    pub companies: Vec<Company>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompanyFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub company_type: Option<String>,
}

// =============================================================================
// Vacancies
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct VacancyRecord {
    pub id: String,
    pub title: String,
    pub experience: i32,
    pub salary: i32,
    pub position_status: String,
    pub schedule: String,
    pub work_format: String,
    pub company_id: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub attachment_id: String,
}

/// Create/update body for a vacancy. On create `title` and `company_id`
/// are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VacancyDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<String>,
}

impl VacancyDraft {
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.as_deref().map_or(true, is_blank) {
            Some("title")
        } else if self.company_id.as_deref().map_or(true, is_blank) {
            Some("company_id")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Vacancy {
    #[serde(flatten)]
    pub vacancy: VacancyRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<FileInfo>,
}

impl From<VacancyRecord> for Vacancy {
    fn from(vacancy: VacancyRecord) -> Self {
        Self {
            vacancy,
            attachment: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct VacancyPage {
    #[serde(default)]
    pub vacancies: Vec<VacancyRecord>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VacancyList {
    pub vacancies: Vec<Vacancy>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VacancyFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub company_id: Option<String>,
    pub position_status: Option<String>,
    pub work_format: Option<String>,
    pub schedule: Option<String>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub search_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PositionList {
    #[serde(default)]
    pub positions: Vec<String>,
}
