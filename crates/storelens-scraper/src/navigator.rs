//! Page-loading seams shared by the fetch tiers and the context extractor.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

/// Loads the markup of a single URL.
///
/// Implemented by both tiers so that secondary navigations (product detail
/// pages, about and FAQ pages) go through whichever tier produced the
/// landing page.
#[async_trait]
pub trait PageNavigator: Send + Sync {
    async fn load(&self, url: &str) -> Result<String, ScraperError>;
}

/// A live headless browser. Must be closed explicitly on normal paths;
/// dropping it without closing still kills the browser process.
#[async_trait]
pub trait BrowserSession: PageNavigator {
    /// Like [`PageNavigator::load`], but runs `actions` in order after the
    /// page settles and returns the DOM as it stands afterwards.
    async fn load_with(&self, url: &str, actions: &[PageAction])
        -> Result<String, ScraperError>;

    async fn close(self: Box<Self>);
}

/// Starts isolated browser sessions on demand.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScraperError>;
}

/// An interaction performed on a rendered page before its DOM is read.
///
/// A selector that matches nothing ends that action without waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    /// Click the first element matching `selector`.
    Click { selector: String, wait: Duration },
    /// Scroll the first element matching `selector` to its bottom, `times`
    /// times, waiting after each scroll.
    Scroll {
        selector: String,
        times: u8,
        wait: Duration,
    },
}

impl PageAction {
    #[must_use]
    pub fn click(selector: &str, wait: Duration) -> Self {
        Self::Click {
            selector: selector.to_string(),
            wait,
        }
    }

    #[must_use]
    pub fn scroll(selector: &str, times: u8, wait: Duration) -> Self {
        Self::Scroll {
            selector: selector.to_string(),
            times,
            wait,
        }
    }

    /// Script evaluated once per step; resolves to `true` when an element
    /// matched.
    #[must_use]
    pub fn script(&self) -> String {
        match self {
            Self::Click { selector, .. } => format!(
                "(() => {{ const el = document.querySelector('{}'); \
                 if (el) {{ el.click(); return true; }} return false; }})()",
                escape_js(selector)
            ),
            Self::Scroll { selector, .. } => format!(
                "(() => {{ const el = document.querySelector('{}'); \
                 if (el) {{ el.scrollTop = el.scrollHeight; return true; }} return false; }})()",
                escape_js(selector)
            ),
        }
    }

    /// How many times the script runs.
    #[must_use]
    pub fn repetitions(&self) -> u8 {
        match self {
            Self::Click { .. } => 1,
            Self::Scroll { times, .. } => *times,
        }
    }

    #[must_use]
    pub fn wait(&self) -> Duration {
        match self {
            Self::Click { wait, .. } | Self::Scroll { wait, .. } => *wait,
        }
    }
}

/// Escapes a value for a single-quoted JS string literal.
fn escape_js(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '<' => escaped.push_str("\\x3c"),
            '\0' => {}
            _ => escaped.push(ch),
        }
    }
    escaped
}
