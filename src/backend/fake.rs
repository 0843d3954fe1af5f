// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory backends for tests, with call counters and failure injection.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::body::Bytes;

use super::{
    AuthBackend, BackendClientSet, BackendError, BackendStatus, CompanyBackend, Credentials,
    FileBackend, ObjectUploader, Service, Session, TokenInfo, TransferError, UploadRequest,
    UsersBackend, VacancyBackend,
};
use crate::auth::WireRole;
use crate::models::{
    CompanyFilter, CompanyPage, CompanyPatch, CompanyRecord, DownloadUrl, FileMeta,
    PaginationInfo, PositionList, ProfileFilter, ProfilePage, ProfilePatch, ProfileRecord,
    UploadTicket, VacancyDraft, VacancyFilter, VacancyPage, VacancyRecord,
};

fn injected(slot: &Mutex<Option<BackendStatus>>, service: Service) -> Result<(), BackendError> {
    match *slot.lock().unwrap() {
        Some(status) => Err(BackendError::new(service, status, "injected failure")),
        None => Ok(()),
    }
}

fn paginate(total: usize) -> PaginationInfo {
    PaginationInfo {
        total: total as u32,
        pages: if total == 0 { 0 } else { 1 },
        current_page: 1,
    }
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user_id: String,
    role: WireRole,
}

#[derive(Default)]
pub struct FakeAuth {
    accounts: Mutex<HashMap<String, Account>>,
    tokens: Mutex<HashMap<String, (String, WireRole)>>,
    pub parse_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub fail_parse: Mutex<Option<BackendStatus>>,
    pub fail_delete: Mutex<Option<BackendStatus>>,
    /// Role reported by `login` in place of the account's own.
    pub login_role: Mutex<Option<WireRole>>,
}

impl FakeAuth {
    /// Make `token` resolve to `user_id` with `role`.
    pub fn issue_token(&self, token: &str, user_id: &str, role: WireRole) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), (user_id.to_string(), role));
    }

    pub fn has_account(&self, email: &str) -> bool {
        self.accounts.lock().unwrap().contains_key(email)
    }

    pub fn parse_count(&self) -> usize {
        self.parse_calls.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthBackend for FakeAuth {
    async fn login(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&credentials.email) {
            Some(account)
                if account.password == credentials.password && account.role == credentials.role =>
            {
                Ok(Session {
                    token: format!("token-{}", account.user_id),
                    user_uuid: account.user_id.clone(),
                    role: self.login_role.lock().unwrap().unwrap_or(account.role),
                })
            }
            _ => Err(BackendError::new(
                Service::Auth,
                BackendStatus::Unauthenticated,
                "invalid credentials",
            )),
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&credentials.email) {
            return Err(BackendError::new(
                Service::Auth,
                BackendStatus::AlreadyExists,
                "email taken",
            ));
        }
        let user_id = uuid::Uuid::new_v4().to_string();
        accounts.insert(
            credentials.email.clone(),
            Account {
                password: credentials.password.clone(),
                user_id: user_id.clone(),
                role: credentials.role,
            },
        );
        let token = format!("token-{user_id}");
        self.issue_token(&token, &user_id, credentials.role);
        Ok(Session {
            token,
            user_uuid: user_id,
            role: credentials.role,
        })
    }

    async fn parse_token(&self, token: &str) -> Result<TokenInfo, BackendError> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.fail_parse, Service::Auth)?;
        Ok(match self.tokens.lock().unwrap().get(token) {
            Some((user_id, role)) => TokenInfo {
                valid: true,
                user_uuid: user_id.clone(),
                role: *role,
            },
            None => TokenInfo {
                valid: false,
                user_uuid: String::new(),
                role: WireRole::Unspecified,
            },
        })
    }

    async fn logout(&self, user_id: &str) -> Result<(), BackendError> {
        self.tokens
            .lock()
            .unwrap()
            .retain(|_, (owner, _)| owner != user_id);
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.fail_delete, Service::Auth)?;
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|_, account| account.user_id != user_id);
        self.tokens
            .lock()
            .unwrap()
            .retain(|_, (owner, _)| owner != user_id);
        if accounts.len() == before {
            return Err(BackendError::new(
                Service::Auth,
                BackendStatus::NotFound,
                "no such user",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Default)]
pub struct FakeUsers {
    profiles: Mutex<BTreeMap<String, ProfileRecord>>,
    pub fail_create: Mutex<Option<BackendStatus>>,
    pub fail_get: Mutex<Option<BackendStatus>>,
    pub fail_update: Mutex<Option<BackendStatus>>,
    pub fail_delete: Mutex<Option<BackendStatus>>,
    pub create_calls: AtomicUsize,
}

impl FakeUsers {
    pub fn insert(&self, profile: ProfileRecord) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
    }

    pub fn get(&self, id: &str) -> Option<ProfileRecord> {
        self.profiles.lock().unwrap().get(id).cloned()
    }

    fn not_found() -> BackendError {
        BackendError::new(Service::Users, BackendStatus::NotFound, "no such profile")
    }
}

#[async_trait]
impl UsersBackend for FakeUsers {
    async fn create_profile(&self, profile: &ProfileRecord) -> Result<ProfileRecord, BackendError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.fail_create, Service::Users)?;
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&profile.id) {
            return Err(BackendError::new(
                Service::Users,
                BackendStatus::AlreadyExists,
                "duplicate profile",
            ));
        }
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile.clone())
    }

    async fn get_profile(&self, id: &str) -> Result<ProfileRecord, BackendError> {
        injected(&self.fail_get, Service::Users)?;
        self.get(id).ok_or_else(Self::not_found)
    }

    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<ProfilePage, BackendError> {
        let profiles: Vec<ProfileRecord> = self
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| p.profession_category == c)
            })
            .cloned()
            .collect();
        Ok(ProfilePage {
            pagination: paginate(profiles.len()),
            profiles,
        })
    }

    async fn update_profile(
        &self,
        id: &str,
        patch: &ProfilePatch,
    ) -> Result<ProfileRecord, BackendError> {
        injected(&self.fail_update, Service::Users)?;
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.get_mut(id).ok_or_else(Self::not_found)?;
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = &patch.$field {
                    profile.$field = value.clone();
                })*
            };
        }
        apply!(
            first_name,
            last_name,
            age,
            tg,
            description,
            profession_category,
            avatar_id,
            resume_id
        );
        Ok(profile.clone())
    }

    async fn delete_profile(&self, id: &str) -> Result<(), BackendError> {
        injected(&self.fail_delete, Service::Users)?;
        self.profiles
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(Self::not_found)
    }
}

// =============================================================================
// Companies
// =============================================================================

#[derive(Default)]
pub struct FakeCompanies {
    companies: Mutex<BTreeMap<String, CompanyRecord>>,
    pub fail_create: Mutex<Option<BackendStatus>>,
    pub fail_delete: Mutex<Option<BackendStatus>>,
}

impl FakeCompanies {
    pub fn insert(&self, company: CompanyRecord) {
        self.companies
            .lock()
            .unwrap()
            .insert(company.id.clone(), company);
    }

    pub fn get(&self, id: &str) -> Option<CompanyRecord> {
        self.companies.lock().unwrap().get(id).cloned()
    }

    fn not_found() -> BackendError {
        BackendError::new(Service::Company, BackendStatus::NotFound, "no such company")
    }
}

#[async_trait]
impl CompanyBackend for FakeCompanies {
    async fn create_company(&self, company: &CompanyRecord) -> Result<CompanyRecord, BackendError> {
        injected(&self.fail_create, Service::Company)?;
        self.insert(company.clone());
        Ok(company.clone())
    }

    async fn get_company(&self, id: &str) -> Result<CompanyRecord, BackendError> {
        self.get(id).ok_or_else(Self::not_found)
    }

    async fn list_companies(&self, filter: &CompanyFilter) -> Result<CompanyPage, BackendError> {
        let companies: Vec<CompanyRecord> = self
            .companies
            .lock()
            .unwrap()
            .values()
            .filter(|c| filter.city.as_deref().map_or(true, |city| c.city == city))
            .cloned()
            .collect();
        Ok(CompanyPage {
            pagination: paginate(companies.len()),
            companies,
        })
    }

    async fn update_company(
        &self,
        id: &str,
        patch: &CompanyPatch,
    ) -> Result<CompanyRecord, BackendError> {
        let mut companies = self.companies.lock().unwrap();
        let company = companies.get_mut(id).ok_or_else(Self::not_found)?;
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = &patch.$field {
                    company.$field = value.clone();
                })*
            };
        }
        apply!(name, description, city, site, company_type, logo_id);
        Ok(company.clone())
    }

    async fn delete_company(&self, id: &str) -> Result<(), BackendError> {
        injected(&self.fail_delete, Service::Company)?;
        self.companies
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(Self::not_found)
    }
}

// =============================================================================
// Vacancies
// =============================================================================

#[derive(Default)]
pub struct FakeVacancies {
    vacancies: Mutex<BTreeMap<String, VacancyRecord>>,
    next_id: AtomicUsize,
}

impl FakeVacancies {
    pub fn insert(&self, vacancy: VacancyRecord) {
        self.vacancies
            .lock()
            .unwrap()
            .insert(vacancy.id.clone(), vacancy);
    }

    pub fn get(&self, id: &str) -> Option<VacancyRecord> {
        self.vacancies.lock().unwrap().get(id).cloned()
    }

    fn not_found() -> BackendError {
        BackendError::new(Service::Vacancy, BackendStatus::NotFound, "no such vacancy")
    }

    fn apply(vacancy: &mut VacancyRecord, draft: &VacancyDraft) {
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = &draft.$field {
                    vacancy.$field = value.clone();
                })*
            };
        }
        apply!(
            title,
            experience,
            salary,
            position_status,
            schedule,
            work_format,
            company_id,
            attachment_id
        );
    }

    fn page(&self, filter: &VacancyFilter) -> VacancyPage {
        let vacancies: Vec<VacancyRecord> = self
            .vacancies
            .lock()
            .unwrap()
            .values()
            .filter(|v| {
                filter
                    .company_id
                    .as_deref()
                    .map_or(true, |id| v.company_id == id)
            })
            .cloned()
            .collect();
        VacancyPage {
            pagination: paginate(vacancies.len()),
            vacancies,
        }
    }
}

#[async_trait]
impl VacancyBackend for FakeVacancies {
    async fn create_vacancy(&self, draft: &VacancyDraft) -> Result<VacancyRecord, BackendError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut vacancy = VacancyRecord {
            id: format!("v-{n}"),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            ..Default::default()
        };
        Self::apply(&mut vacancy, draft);
        self.insert(vacancy.clone());
        Ok(vacancy)
    }

    async fn get_vacancy(&self, id: &str) -> Result<VacancyRecord, BackendError> {
        self.get(id).ok_or_else(Self::not_found)
    }

    async fn list_vacancies(&self, filter: &VacancyFilter) -> Result<VacancyPage, BackendError> {
        Ok(self.page(filter))
    }

    async fn list_hr_vacancies(
        &self,
        filter: &VacancyFilter,
    ) -> Result<VacancyPage, BackendError> {
        Ok(self.page(filter))
    }

    async fn update_vacancy(
        &self,
        id: &str,
        draft: &VacancyDraft,
    ) -> Result<VacancyRecord, BackendError> {
        let mut vacancies = self.vacancies.lock().unwrap();
        let vacancy = vacancies.get_mut(id).ok_or_else(Self::not_found)?;
        Self::apply(vacancy, draft);
        Ok(vacancy.clone())
    }

    async fn delete_vacancy(&self, id: &str) -> Result<(), BackendError> {
        self.vacancies
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(Self::not_found)
    }

    async fn positions(&self) -> Result<PositionList, BackendError> {
        Ok(PositionList {
            positions: vec!["Backend Developer".into(), "QA Engineer".into()],
        })
    }
}

// =============================================================================
// Files
// =============================================================================

#[derive(Default)]
pub struct FakeFiles {
    /// (entity id, file key) -> metadata
    objects: Mutex<BTreeMap<(String, String), FileMeta>>,
    /// File keys whose download lookup fails.
    broken: Mutex<HashSet<String>>,
    pub fail_download: Mutex<Option<BackendStatus>>,
    pub fail_confirm: Mutex<Option<BackendStatus>>,
    pub download_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl FakeFiles {
    /// Store an object with the given content type.
    pub fn put_object(&self, entity_id: &str, file_key: &str, content_type: &str) {
        self.objects.lock().unwrap().insert(
            (entity_id.to_string(), file_key.to_string()),
            FileMeta {
                name: file_key.to_string(),
                user_uuid: entity_id.to_string(),
                file_name: file_key.to_string(),
                file_type: content_type.to_string(),
                file_size: 1,
                created_at: "2026-01-01T00:00:00Z".to_string(),
            },
        );
    }

    /// Make download lookups for `file_key` fail with `Unavailable`.
    pub fn break_lookup(&self, file_key: &str) {
        self.broken.lock().unwrap().insert(file_key.to_string());
    }

    pub fn contains(&self, entity_id: &str, file_key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(entity_id.to_string(), file_key.to_string()))
    }

    pub fn download_count(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    fn not_found() -> BackendError {
        BackendError::new(Service::Achievement, BackendStatus::NotFound, "no such file")
    }
}

#[async_trait]
impl FileBackend for FakeFiles {
    async fn list_files(&self, entity_id: &str) -> Result<Vec<FileMeta>, BackendError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|((owner, _), _)| owner == entity_id)
            .map(|(_, meta)| meta.clone())
            .collect())
    }

    async fn download_url(
        &self,
        entity_id: &str,
        file_key: &str,
    ) -> Result<DownloadUrl, BackendError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        injected(&self.fail_download, Service::Achievement)?;
        if self.broken.lock().unwrap().contains(file_key) {
            return Err(BackendError::new(
                Service::Achievement,
                BackendStatus::Unavailable,
                "storage offline",
            ));
        }
        let objects = self.objects.lock().unwrap();
        let meta = objects
            .get(&(entity_id.to_string(), file_key.to_string()))
            .ok_or_else(Self::not_found)?;
        Ok(DownloadUrl {
            url: format!("https://storage.test/{entity_id}/{file_key}?sig=abc"),
            expires_at: 1_900_000_000,
            content_type: Some(meta.file_type.clone()),
        })
    }

    async fn upload_url(&self, request: &UploadRequest) -> Result<UploadTicket, BackendError> {
        Ok(UploadTicket {
            upload_url: format!(
                "https://storage.test/upload/{}/{}",
                request.user_uuid, request.achievement_name
            ),
            s3_key: format!("{}/{}", request.user_uuid, request.achievement_name),
            expires_at: 1_900_000_000,
        })
    }

    async fn confirm(&self, meta: &FileMeta, _storage_key: &str) -> Result<(), BackendError> {
        injected(&self.fail_confirm, Service::Achievement)?;
        self.objects
            .lock()
            .unwrap()
            .insert((meta.user_uuid.clone(), meta.name.clone()), meta.clone());
        Ok(())
    }

    async fn delete_file(&self, entity_id: &str, file_key: &str) -> Result<(), BackendError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .remove(&(entity_id.to_string(), file_key.to_string()))
            .map(|_| ())
            .ok_or_else(Self::not_found)
    }
}

#[derive(Default)]
pub struct FakeUploader {
    pub puts: Mutex<Vec<(String, String, usize)>>,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl ObjectUploader for FakeUploader {
    async fn put(&self, url: &str, content_type: &str, bytes: Bytes) -> Result<(), TransferError> {
        if *self.fail.lock().unwrap() {
            return Err(TransferError("PUT returned 500".into()));
        }
        self.puts
            .lock()
            .unwrap()
            .push((url.to_string(), content_type.to_string(), bytes.len()));
        Ok(())
    }
}

/// Every fake, plus the [`BackendClientSet`] wired to them.
#[derive(Default, Clone)]
pub struct FakeBackends {
    pub auth: Arc<FakeAuth>,
    pub users: Arc<FakeUsers>,
    pub companies: Arc<FakeCompanies>,
    pub vacancies: Arc<FakeVacancies>,
    pub files: Arc<FakeFiles>,
    pub uploader: Arc<FakeUploader>,
}

impl FakeBackends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_set(&self) -> BackendClientSet {
        BackendClientSet {
            auth: self.auth.clone(),
            users: self.users.clone(),
            companies: self.companies.clone(),
            vacancies: self.vacancies.clone(),
            files: self.files.clone(),
            uploader: self.uploader.clone(),
        }
    }
}
