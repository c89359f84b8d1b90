//! Markup and URL helpers shared by the extractors.

use scraper::{ElementRef, Selector};

pub use storelens_core::site_host;

/// Collapses runs of whitespace into single spaces and trims.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element with whitespace normalized.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Truncates to at most `max_chars` characters without splitting a char.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Parses a CSS selector, logging and skipping invalid ones.
#[must_use]
pub fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!(css, error = %e, "skipping unparseable selector");
            None
        }
    }
}

#[must_use]
pub fn compile_all(candidates: &[&str]) -> Vec<Selector> {
    candidates.iter().filter_map(|css| parse_selector(css)).collect()
}

/// Resolves an `href`/`src` value found on a page at `base_url`.
///
/// Protocol-relative values (`//cdn...`) are forced to `https:`; root-relative
/// and relative values are joined onto `base_url`. Returns `None` for
/// non-navigable values (`javascript:`, `data:`, fragments) or when the base
/// does not parse.
#[must_use]
pub fn resolve_url(base_url: &str, candidate: &str) -> Option<String> {
    let candidate = candidate.trim().replace("&amp;", "&");
    if candidate.is_empty()
        || candidate.starts_with('#')
        || candidate.starts_with("javascript:")
        || candidate.starts_with("data:")
    {
        return None;
    }
    if let Some(rest) = candidate.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return Some(candidate);
    }
    let base = reqwest::Url::parse(base_url).ok()?;
    base.join(&candidate).ok().map(|u| u.to_string())
}
