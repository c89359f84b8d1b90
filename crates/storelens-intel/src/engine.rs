//! Synthesis entry point.

use storelens_core::{
    parse_site_url, Diagnosis, ReputationSignal, SignalStatus, SocialSignal, WebObservation,
};

use crate::error::SynthesisError;
use crate::rules;
use crate::scoring::overall_score;
use crate::solutions::recommended_solutions;
use crate::summary::executive_summary;

/// Stateless rule engine turning observations into a [`Diagnosis`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightEngine;

impl InsightEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Runs every rule over the inputs and scores the result.
    ///
    /// External signals whose status is not `found` are skipped. Rules run in
    /// a fixed order (web, reputation, social), which fixes the insight order
    /// and therefore summary tie-breaking.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::MalformedInput`] when the web observation is
    /// missing or its URL is empty or not an absolute http(s) URL.
    pub fn synthesize(
        &self,
        web: Option<&WebObservation>,
        reputation: Option<&ReputationSignal>,
        social: Option<&SocialSignal>,
    ) -> Result<Diagnosis, SynthesisError> {
        let web = web.ok_or_else(|| {
            SynthesisError::MalformedInput("web observation is required".to_string())
        })?;
        let url = web.url.trim();
        if url.is_empty() {
            return Err(SynthesisError::MalformedInput(
                "web observation has an empty url".to_string(),
            ));
        }
        parse_site_url(url).map_err(|e| SynthesisError::MalformedInput(e.to_string()))?;

        let mut insights = Vec::new();
        rules::web::analyze(web, &mut insights);
        if let Some(signal) = reputation.filter(|s| s.status == SignalStatus::Found) {
            rules::reputation::analyze(signal, &mut insights);
        }
        if let Some(signal) = social.filter(|s| s.status == SignalStatus::Found) {
            rules::social::analyze(signal, &mut insights);
        }

        let business_name = if web.context.has_name() {
            web.context.name.trim().to_string()
        } else {
            url.to_string()
        };
        let score = overall_score(&insights);
        let summary = executive_summary(&business_name, score, &insights);
        let solutions = recommended_solutions(&insights);

        tracing::debug!(
            url,
            insights = insights.len(),
            score,
            solutions = solutions.len(),
            "synthesized diagnosis"
        );

        Ok(Diagnosis::new(
            business_name,
            url.to_string(),
            score,
            insights,
            summary,
            solutions,
        ))
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
