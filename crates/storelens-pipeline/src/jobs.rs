//! Investigation job tracking.
//!
//! A job moves `pending → running → completed | failed`. [`JobTracker`]
//! creates jobs and serves read-only snapshots; the single [`JobWriter`]
//! handed out by [`JobTracker::create_job`] is the only way to mutate one.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::investigation::InvestigationReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Which external collectors an investigation runs, and what is already
/// known about the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationOptions {
    /// Appended to the map search query when present.
    pub location: Option<String>,
    /// Known business name, used when the website does not yield one.
    #[serde(default)]
    pub business_name: Option<String>,
    pub include_reputation: bool,
    pub include_social: bool,
}

impl Default for InvestigationOptions {
    fn default() -> Self {
        Self {
            location: None,
            business_name: None,
            include_reputation: true,
            include_social: true,
        }
    }
}

/// Point-in-time view of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub url: String,
    pub options: InvestigationOptions,
    pub status: JobStatus,
    /// 0–100, never decreases.
    pub progress: u8,
    pub current_step: String,
    pub result: Option<InvestigationReport>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobSnapshot {
    fn pending(url: &str, options: InvestigationOptions) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            url: url.trim().to_string(),
            options,
            status: JobStatus::Pending,
            progress: 0,
            current_step: "Queued".to_string(),
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Storage backend for job snapshots.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn put(&self, snapshot: JobSnapshot);
    async fn get(&self, id: JobId) -> Option<JobSnapshot>;
    /// Returns `true` when the job existed.
    async fn delete(&self, id: JobId) -> bool;
    async fn list(&self) -> Vec<JobSnapshot>;
}

/// Process-local store; jobs are lost on exit.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, JobSnapshot>>,
}

impl InMemoryJobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn put(&self, snapshot: JobSnapshot) {
        self.jobs.write().await.insert(snapshot.id, snapshot);
    }

    async fn get(&self, id: JobId) -> Option<JobSnapshot> {
        self.jobs.read().await.get(&id).cloned()
    }

    async fn delete(&self, id: JobId) -> bool {
        self.jobs.write().await.remove(&id).is_some()
    }

    async fn list(&self) -> Vec<JobSnapshot> {
        self.jobs.read().await.values().cloned().collect()
    }
}

/// Creates jobs and reads them back.
#[derive(Clone)]
pub struct JobTracker {
    store: Arc<dyn JobStore>,
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryJobStore::new()))
    }
}

impl JobTracker {
    #[must_use]
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Registers a pending job and returns its only writer.
    pub async fn create_job(&self, url: &str, options: InvestigationOptions) -> (JobId, JobWriter) {
        let snapshot = JobSnapshot::pending(url, options);
        let id = snapshot.id;
        self.store.put(snapshot.clone()).await;
        tracing::debug!(job = %id, url = %snapshot.url, "job created");
        (
            id,
            JobWriter {
                store: Arc::clone(&self.store),
                snapshot,
            },
        )
    }

    pub async fn get_job(&self, id: JobId) -> Option<JobSnapshot> {
        self.store.get(id).await
    }

    /// All jobs, oldest first.
    pub async fn list_jobs(&self) -> Vec<JobSnapshot> {
        let mut jobs = self.store.list().await;
        jobs.sort_by_key(|j| j.created_at);
        jobs
    }

    pub async fn delete_job(&self, id: JobId) -> bool {
        self.store.delete(id).await
    }
}

/// Exclusive write handle for one job. Not `Clone`; finishing consumes it.
pub struct JobWriter {
    store: Arc<dyn JobStore>,
    snapshot: JobSnapshot,
}

impl JobWriter {
    #[must_use]
    pub fn id(&self) -> JobId {
        self.snapshot.id
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.snapshot.url
    }

    #[must_use]
    pub fn options(&self) -> &InvestigationOptions {
        &self.snapshot.options
    }

    #[must_use]
    pub fn snapshot(&self) -> &JobSnapshot {
        &self.snapshot
    }

    pub async fn start(&mut self) {
        self.snapshot.status = JobStatus::Running;
        self.step(0, "Starting investigation").await;
    }

    /// Records a checkpoint. Progress is clamped to 100 and never moves
    /// backwards.
    pub async fn step(&mut self, progress: u8, current_step: &str) {
        self.snapshot.progress = self.snapshot.progress.max(progress.min(100));
        current_step.clone_into(&mut self.snapshot.current_step);
        self.publish().await;
    }

    pub async fn complete(mut self, report: InvestigationReport) -> JobSnapshot {
        self.snapshot.status = JobStatus::Completed;
        self.snapshot.progress = 100;
        self.snapshot.current_step = "Completed".to_string();
        self.snapshot.result = Some(report);
        self.publish().await;
        self.snapshot
    }

    pub async fn fail(mut self, error: impl Into<String>) -> JobSnapshot {
        let error = error.into();
        self.snapshot.status = JobStatus::Failed;
        self.snapshot.current_step = format!("Error: {error}");
        self.snapshot.error = Some(error);
        self.publish().await;
        self.snapshot
    }

    /// Writes the snapshot unless the job was deleted meanwhile.
    async fn publish(&mut self) {
        self.snapshot.updated_at = Utc::now();
        if self.store.get(self.snapshot.id).await.is_some() {
            self.store.put(self.snapshot.clone()).await;
        } else {
            tracing::debug!(job = %self.snapshot.id, "job deleted, dropping update");
        }
    }
}

#[cfg(test)]
#[path = "jobs_test.rs"]
mod tests;
