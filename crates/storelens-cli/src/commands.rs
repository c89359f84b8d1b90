//! Command handlers for the CLI.
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr. A failed
//! target in a batch run is logged and skipped so the rest still run.

use std::path::Path;

use serde::Serialize;
use storelens_core::{AppConfig, FetchTier, Platform};
use storelens_pipeline::{InvestigationOptions, Investigator, JobStatus, JobTracker};
use storelens_scraper::FetchTierManager;

/// Runs one investigation. Ctrl-C cancels it and still prints the failed
/// job snapshot.
///
/// # Errors
///
/// Returns an error if the fetcher cannot be built or the snapshot cannot be
/// serialized.
pub(crate) async fn run_investigate(
    config: &AppConfig,
    url: &str,
    options: InvestigationOptions,
) -> anyhow::Result<()> {
    let investigator = Investigator::from_config(config)?;
    let tracker = JobTracker::default();
    let (id, writer) = tracker.create_job(url, options).await;
    tracing::info!(job = %id, url, "starting investigation");

    let snapshot = investigator
        .run_until_cancelled(writer, async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await;

    print_json(&snapshot)?;
    if snapshot.status == JobStatus::Failed {
        anyhow::bail!(
            "investigation failed: {}",
            snapshot.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

/// Website-only analysis.
///
/// # Errors
///
/// Returns an error if the fetcher cannot be built or synthesis rejects the
/// observation.
pub(crate) async fn run_quick(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct QuickReport<'a> {
        web: &'a storelens_core::WebObservation,
        diagnosis: &'a storelens_core::Diagnosis,
    }

    let investigator = Investigator::from_config(config)?;
    let (web, diagnosis) = investigator.quick_analysis(url).await?;
    print_json(&QuickReport {
        web: &web,
        diagnosis: &diagnosis,
    })
}

#[derive(Debug, Serialize)]
struct Detection {
    url: String,
    platform: Option<Platform>,
    tier: FetchTier,
}

/// Fetches the page through the tier manager and reports the platform.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub(crate) async fn run_detect(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let manager = FetchTierManager::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build fetcher: {e}"))?;
    let (markup, tier) = manager.fetch(url).await;
    let detection = Detection {
        url: url.to_string(),
        platform: storelens_scraper::detect(&markup),
        tier,
    };
    tracing::info!(
        url,
        platform = ?detection.platform,
        tier = %detection.tier,
        "platform detected"
    );
    print_json(&detection)
}

/// Investigates every configured target sequentially.
///
/// # Errors
///
/// Returns an error if the targets file is invalid or the fetcher cannot be
/// built. Per-target failures are logged and counted, not propagated.
pub(crate) async fn run_batch(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let targets = storelens_core::load_targets(path)?.targets;
    let investigator = Investigator::from_config(config)?;
    let tracker = JobTracker::default();

    let mut failed = 0_usize;
    for target in &targets {
        let options = InvestigationOptions {
            location: target.location.clone(),
            business_name: Some(target.name.clone()),
            ..InvestigationOptions::default()
        };
        let (id, writer) = tracker.create_job(&target.url, options).await;
        tracing::info!(job = %id, target = %target.name, url = %target.url, "investigating target");

        let snapshot = investigator.investigate(writer).await;
        if snapshot.status == JobStatus::Failed {
            failed += 1;
            tracing::warn!(
                target = %target.name,
                error = snapshot.error.as_deref().unwrap_or("unknown error"),
                "target failed"
            );
        }
    }

    if failed > 0 {
        tracing::warn!(failed, total = targets.len(), "some targets failed");
    }
    print_json(&tracker.list_jobs().await)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
