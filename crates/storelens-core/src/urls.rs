//! Site URL validation shared by the pipeline, the fetcher and the engine.

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid URL {url:?}: {reason}")]
pub struct InvalidUrl {
    pub url: String,
    pub reason: String,
}

/// Parses an absolute `http`/`https` URL with a host.
///
/// # Errors
///
/// Returns [`InvalidUrl`] for anything else, including bare domains without
/// a scheme.
pub fn parse_site_url(raw: &str) -> Result<Url, InvalidUrl> {
    let trimmed = raw.trim();
    let invalid = |reason: String| InvalidUrl {
        url: trimmed.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "unsupported scheme '{}'; expected http or https",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// Lowercased host of a URL without a leading `www.`.
#[must_use]
pub fn site_host(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.trim_start_matches("www.").to_string())
}
