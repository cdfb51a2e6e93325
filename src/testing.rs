// src/testing.rs
//! In-memory fakes for the injected backends, shared by unit tests.

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::core::ServiceError;
use crate::error::{CareerMatchError, CareerResult};
use crate::job_search::{JobSearchProvider, JobSearchQuery};
use crate::profile::{BlobStore, DepartmentCatalog, ProfileStore, SavedJobStore};
use crate::recommendation::CompletionProvider;
use crate::types::{Department, JobPosting, UserId, UserProfile};

#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
    saved: Mutex<HashMap<UserId, Vec<JobPosting>>>,
    departments: Mutex<Vec<Department>>,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_blobs: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn fail_blob_writes(&self, fail: bool) {
        self.fail_blobs.store(fail, Ordering::SeqCst);
    }

    pub fn fail_profile_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    fn update_profile(&self, uid: &UserId, apply: impl FnOnce(&mut UserProfile)) {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.entry(uid.clone()).or_default();
        apply(profile);
        profile.updated_at = Some(chrono::Utc::now());
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn load(&self, uid: &UserId) -> CareerResult<Option<UserProfile>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CareerMatchError::Persistence("store offline".to_string()));
        }
        Ok(self.profiles.lock().unwrap().get(uid).cloned())
    }

    async fn set_department(
        &self,
        uid: &UserId,
        email: Option<&str>,
        department: &Department,
    ) -> CareerResult<()> {
        self.update_profile(uid, |profile| {
            if let Some(email) = email {
                profile.email = Some(email.to_string());
            }
            profile.department_id = Some(department.id.clone());
            profile.department_name = Some(department.name.clone());
        });
        Ok(())
    }

    async fn set_transcript(&self, uid: &UserId, url: &str, text: &str) -> CareerResult<()> {
        self.update_profile(uid, |profile| {
            profile.transcript_url = Some(url.to_string());
            profile.transcript_text = Some(text.to_string());
        });
        Ok(())
    }

    async fn set_extra_info(&self, uid: &UserId, extra_info: Option<&str>) -> CareerResult<()> {
        self.update_profile(uid, |profile| {
            profile.extra_info = extra_info.map(str::to_string);
        });
        Ok(())
    }
}

#[async_trait]
impl SavedJobStore for MemoryStore {
    async fn upsert(&self, uid: &UserId, posting: &JobPosting) -> CareerResult<()> {
        let mut saved = self.saved.lock().unwrap();
        let jobs = saved.entry(uid.clone()).or_default();
        match jobs.iter_mut().find(|job| job.id == posting.id) {
            Some(existing) => *existing = posting.clone(),
            None => jobs.push(posting.clone()),
        }
        Ok(())
    }

    async fn remove(&self, uid: &UserId, job_id: &str) -> CareerResult<bool> {
        let mut saved = self.saved.lock().unwrap();
        let Some(jobs) = saved.get_mut(uid) else {
            return Ok(false);
        };
        let before = jobs.len();
        jobs.retain(|job| job.id != job_id);
        Ok(jobs.len() != before)
    }

    async fn list(&self, uid: &UserId) -> CareerResult<Vec<JobPosting>> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .get(uid)
            .cloned()
            .unwrap_or_default())
    }

    async fn contains(&self, uid: &UserId, job_id: &str) -> CareerResult<bool> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .get(uid)
            .is_some_and(|jobs| jobs.iter().any(|job| job.id == job_id)))
    }
}

#[async_trait]
impl DepartmentCatalog for MemoryStore {
    async fn list_departments(&self) -> CareerResult<Vec<Department>> {
        Ok(self.departments.lock().unwrap().clone())
    }

    async fn get_department(&self, id: &str) -> CareerResult<Option<Department>> {
        Ok(self
            .departments
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn add_department(&self, department: &Department) -> CareerResult<()> {
        let mut departments = self.departments.lock().unwrap();
        departments.retain(|d| d.id != department.id);
        departments.push(department.clone());
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn put(&self, object_path: &str, bytes: &[u8]) -> CareerResult<String> {
        if self.fail_blobs.load(Ordering::SeqCst) {
            return Err(CareerMatchError::Upload("blob store unavailable".to_string()));
        }
        self.blobs
            .lock()
            .unwrap()
            .insert(object_path.to_string(), bytes.to_vec());
        Ok(format!("memory://{}", object_path))
    }
}

/// Completion provider returning a canned reply (or failing), recording
/// every call.
pub struct StubCompletion {
    reply: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_system: Mutex<Option<String>>,
    last_prompt: Mutex<Option<String>>,
}

impl StubCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            last_system: Mutex::new(None),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            ..Self::replying("")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn last_system(&self) -> Option<String> {
        self.last_system.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for StubCompletion {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_system.lock().unwrap() = Some(system.to_string());
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.reply
            .clone()
            .ok_or_else(|| ServiceError::Transport("connection refused".to_string()))
    }
}

pub struct StubJobSearch {
    results: Option<Vec<JobPosting>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_query: Mutex<Option<JobSearchQuery>>,
}

impl StubJobSearch {
    pub fn returning(results: Vec<JobPosting>) -> Self {
        Self {
            results: Some(results),
            delay: None,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            results: None,
            ..Self::returning(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<JobSearchQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSearchProvider for StubJobSearch {
    async fn search(&self, query: &JobSearchQuery) -> Result<Vec<JobPosting>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.results.clone().ok_or_else(|| ServiceError::Status {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: "quota exceeded".to_string(),
        })
    }
}

/// Minimal PDF with one page per entry, each page showing its text in
/// Courier. An empty entry yields a page without text operators.
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
