//! End-to-end investigation runner.
//!
//! Website first, then the reputation and social collectors concurrently,
//! then synthesis. Collector failures and timeouts degrade to error signals;
//! only malformed input fails the job.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storelens_core::{
    parse_site_url, AppConfig, BusinessIdentity, Diagnosis, ReputationSignal, SocialSignal,
    WebObservation,
};
use storelens_intel::InsightEngine;
use storelens_scraper::{BrowserLauncher, FetchTierManager};
use storelens_signals::{
    MapsReputationCollector, ProfileSocialCollector, ReputationSource, SocialSource,
};
use tokio::sync::Mutex;

use crate::error::PipelineError;
use crate::jobs::{InvestigationOptions, JobSnapshot, JobWriter};

/// Produces the web observation for a URL.
#[async_trait]
pub trait WebSource: Send + Sync {
    async fn observe(&self, url: &str) -> WebObservation;
}

#[async_trait]
impl<L: BrowserLauncher> WebSource for FetchTierManager<L> {
    async fn observe(&self, url: &str) -> WebObservation {
        FetchTierManager::observe(self, url).await
    }
}

/// Everything one investigation gathered, plus its diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationReport {
    pub url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub web: WebObservation,
    pub reputation: Option<ReputationSignal>,
    pub social: Option<SocialSignal>,
    pub diagnosis: Diagnosis,
}

/// Runs investigations against pluggable sources.
pub struct Investigator {
    web: Arc<dyn WebSource>,
    reputation: Arc<dyn ReputationSource>,
    social: Arc<dyn SocialSource>,
    engine: InsightEngine,
    collector_timeout: Duration,
}

impl Investigator {
    /// Wires the HTTP/browser fetcher and both browser-backed collectors.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Scraper`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        Ok(Self::new(
            Arc::new(FetchTierManager::from_config(config)?),
            Arc::new(MapsReputationCollector::from_config(config)),
            Arc::new(ProfileSocialCollector::from_config(config)),
            Duration::from_secs(config.collector_timeout_secs),
        ))
    }

    #[must_use]
    pub fn new(
        web: Arc<dyn WebSource>,
        reputation: Arc<dyn ReputationSource>,
        social: Arc<dyn SocialSource>,
        collector_timeout: Duration,
    ) -> Self {
        Self {
            web,
            reputation,
            social,
            engine: InsightEngine::new(),
            collector_timeout,
        }
    }

    /// Runs the job to completion and returns its final snapshot.
    pub async fn investigate(&self, mut writer: JobWriter) -> JobSnapshot {
        let result = self.run(&mut writer).await;
        finish(writer, result).await
    }

    /// Like [`Self::investigate`], but stops as soon as `cancel` resolves.
    ///
    /// In-flight fetches and collectors are dropped, which closes their
    /// browser sessions, and the job is marked failed.
    pub async fn run_until_cancelled<F>(&self, mut writer: JobWriter, cancel: F) -> JobSnapshot
    where
        F: Future<Output = ()> + Send,
    {
        let result = tokio::select! {
            result = self.run(&mut writer) => result,
            () = cancel => Err(PipelineError::Cancelled),
        };
        finish(writer, result).await
    }

    /// Website-only analysis: no external collectors, no job tracking.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidUrl`] before fetching anything when
    /// `url` is not an absolute http(s) URL, and [`PipelineError::Synthesis`]
    /// when the observation is unusable.
    pub async fn quick_analysis(
        &self,
        url: &str,
    ) -> Result<(WebObservation, Diagnosis), PipelineError> {
        let url = url.trim();
        parse_site_url(url)?;
        let web = self.web.observe(url).await;
        let diagnosis = self.engine.synthesize(Some(&web), None, None)?;
        Ok((web, diagnosis))
    }

    async fn run(&self, writer: &mut JobWriter) -> Result<InvestigationReport, PipelineError> {
        let started_at = Utc::now();
        let url = writer.url().to_string();
        let options = writer.options().clone();
        writer.start().await;
        parse_site_url(&url)?;
        tracing::info!(job = %writer.id(), url = %url, "investigation started");

        writer.step(10, "Analyzing website").await;
        let mut web = self.web.observe(&url).await;
        adopt_known_name(&mut web, &options);
        writer.step(30, "Website analyzed").await;
        tracing::info!(
            url = %url,
            tier = %web.tier_used,
            products = web.products.len(),
            "website observed"
        );

        let identity = identity_for(&web, &options);
        let progress = Mutex::new(writer);
        let (reputation, social) = tokio::join!(
            async {
                if !options.include_reputation {
                    return None;
                }
                progress.lock().await.step(40, "Investigating map reputation").await;
                let signal = self.collect_reputation(&identity).await;
                progress.lock().await.step(55, "Map reputation collected").await;
                Some(signal)
            },
            async {
                if !options.include_social {
                    return None;
                }
                progress.lock().await.step(65, "Analyzing social presence").await;
                let signal = self.collect_social(&identity).await;
                progress.lock().await.step(75, "Social presence analyzed").await;
                Some(signal)
            },
        );
        let writer = progress.into_inner();

        writer.step(85, "Generating diagnosis").await;
        let diagnosis = self
            .engine
            .synthesize(Some(&web), reputation.as_ref(), social.as_ref())?;

        writer.step(95, "Preparing deliverables").await;
        Ok(InvestigationReport {
            url,
            started_at,
            finished_at: Utc::now(),
            web,
            reputation,
            social,
            diagnosis,
        })
    }

    async fn collect_reputation(&self, identity: &BusinessIdentity) -> ReputationSignal {
        if let Ok(signal) =
            tokio::time::timeout(self.collector_timeout, self.reputation.collect(identity)).await
        {
            return signal;
        }
        tracing::warn!(
            business = %identity.name,
            timeout_secs = self.collector_timeout.as_secs(),
            "reputation collector timed out"
        );
        ReputationSignal::failed(timeout_message(self.collector_timeout))
    }

    async fn collect_social(&self, identity: &BusinessIdentity) -> SocialSignal {
        if let Ok(signal) =
            tokio::time::timeout(self.collector_timeout, self.social.collect(identity)).await
        {
            return signal;
        }
        tracing::warn!(
            business = %identity.name,
            timeout_secs = self.collector_timeout.as_secs(),
            "social collector timed out"
        );
        SocialSignal::failed(timeout_message(self.collector_timeout))
    }
}

async fn finish(writer: JobWriter, result: Result<InvestigationReport, PipelineError>) -> JobSnapshot {
    let id = writer.id();
    match result {
        Ok(report) => {
            tracing::info!(
                job = %id,
                score = report.diagnosis.score(),
                insights = report.diagnosis.insights().len(),
                "investigation completed"
            );
            writer.complete(report).await
        }
        Err(e) => {
            tracing::warn!(job = %id, error = %e, "investigation failed");
            writer.fail(e.to_string()).await
        }
    }
}

/// Fills in the caller-supplied name when the site yielded none.
fn adopt_known_name(web: &mut WebObservation, options: &InvestigationOptions) {
    if web.context.has_name() {
        return;
    }
    if let Some(name) = options
        .business_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        web.context.name = name.to_string();
    }
}

fn identity_for(web: &WebObservation, options: &InvestigationOptions) -> BusinessIdentity {
    let socials: BTreeMap<_, _> = web
        .context
        .socials
        .iter()
        .filter(|(_, link)| !link.trim().is_empty())
        .map(|(platform, link)| (*platform, link.clone()))
        .collect();
    BusinessIdentity {
        name: web.context.name.clone(),
        url: web.url.clone(),
        location: options.location.clone(),
        socials,
    }
}

fn timeout_message(timeout: Duration) -> String {
    format!("collector timed out after {}s", timeout.as_secs_f32())
}

#[cfg(test)]
#[path = "investigation_test.rs"]
mod tests;
