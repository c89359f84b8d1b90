use std::time::Duration;

use storelens_core::{Diagnosis, WebObservation};

use super::*;

const URL: &str = "https://cafetano.com.ar";

fn report() -> InvestigationReport {
    let now = Utc::now();
    InvestigationReport {
        url: URL.to_string(),
        started_at: now,
        finished_at: now,
        web: WebObservation::empty(URL),
        reputation: None,
        social: None,
        diagnosis: Diagnosis::new(
            "Café Tano".to_string(),
            URL.to_string(),
            70,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        ),
    }
}

// ---------------------------------------------------------------------------
// JobTracker
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_job_is_pending() {
    let tracker = JobTracker::default();
    let (id, writer) = tracker
        .create_job(&format!("  {URL} "), InvestigationOptions::default())
        .await;

    let snapshot = tracker.get_job(id).await.expect("job exists");
    assert_eq!(snapshot.status, JobStatus::Pending);
    assert_eq!(snapshot.progress, 0);
    assert_eq!(snapshot.url, URL);
    assert!(snapshot.result.is_none());
    assert_eq!(writer.id(), id);
}

#[tokio::test]
async fn unknown_job_is_none() {
    let tracker = JobTracker::default();
    let id: JobId = "6f1c1a52-5d0e-4b8e-9d4c-2f3f0c1e9a11".parse().unwrap();
    assert!(tracker.get_job(id).await.is_none());
}

#[tokio::test]
async fn list_is_oldest_first() {
    let tracker = JobTracker::default();
    let (first, _w1) = tracker.create_job(URL, InvestigationOptions::default()).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let (second, _w2) = tracker
        .create_job("https://otro.example", InvestigationOptions::default())
        .await;

    let ids: Vec<JobId> = tracker.list_jobs().await.iter().map(|j| j.id).collect();
    assert_eq!(ids, [first, second]);
}

#[tokio::test]
async fn delete_removes_job() {
    let tracker = JobTracker::default();
    let (id, _writer) = tracker.create_job(URL, InvestigationOptions::default()).await;
    assert!(tracker.delete_job(id).await);
    assert!(!tracker.delete_job(id).await);
    assert!(tracker.list_jobs().await.is_empty());
}

// ---------------------------------------------------------------------------
// JobWriter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_never_moves_backwards() {
    let tracker = JobTracker::default();
    let (id, mut writer) = tracker.create_job(URL, InvestigationOptions::default()).await;

    writer.start().await;
    writer.step(75, "Social presence analyzed").await;
    writer.step(55, "Map reputation collected").await;

    let snapshot = tracker.get_job(id).await.unwrap();
    assert_eq!(snapshot.status, JobStatus::Running);
    assert_eq!(snapshot.progress, 75);
    assert_eq!(snapshot.current_step, "Map reputation collected");
}

#[tokio::test]
async fn complete_stores_result() {
    let tracker = JobTracker::default();
    let (id, mut writer) = tracker.create_job(URL, InvestigationOptions::default()).await;
    writer.start().await;

    let finished = writer.complete(report()).await;

    let stored = tracker.get_job(id).await.unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.progress, 100);
    assert!(stored.is_finished());
    assert_eq!(
        stored.result.as_ref().map(|r| r.diagnosis.score()),
        Some(70)
    );
    assert_eq!(finished.status, JobStatus::Completed);
}

#[tokio::test]
async fn fail_records_error() {
    let tracker = JobTracker::default();
    let (id, writer) = tracker.create_job(URL, InvestigationOptions::default()).await;

    writer.fail("malformed input: web observation has an empty url").await;

    let stored = tracker.get_job(id).await.unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert_eq!(
        stored.error.as_deref(),
        Some("malformed input: web observation has an empty url")
    );
    assert!(stored.current_step.starts_with("Error: "));
    assert!(stored.result.is_none());
}

#[tokio::test]
async fn deleted_job_is_not_resurrected_by_writer() {
    let tracker = JobTracker::default();
    let (id, mut writer) = tracker.create_job(URL, InvestigationOptions::default()).await;
    tracker.delete_job(id).await;

    writer.step(10, "Analyzing website").await;
    writer.complete(report()).await;

    assert!(tracker.get_job(id).await.is_none());
}

#[tokio::test]
async fn snapshot_serializes_status_lowercase() {
    let tracker = JobTracker::default();
    let (_, writer) = tracker.create_job(URL, InvestigationOptions::default()).await;
    let json = serde_json::to_value(writer.snapshot()).unwrap();
    assert_eq!(json["status"], "pending");
    assert_eq!(json["options"]["include_reputation"], true);
}
