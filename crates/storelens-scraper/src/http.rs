use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use reqwest::Client;
use storelens_core::parse_site_url;

use crate::error::ScraperError;
use crate::navigator::PageNavigator;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANG: &str = "es-AR,es;q=0.9,en-US;q=0.8,en;q=0.7";

/// Light tier: a plain HTTP GET dressed up with browser-like headers.
///
/// A page only counts as fetched when the server answers `200 OK` with a
/// non-empty body that is not a bot-challenge interstitial.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANG));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the body of `url`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] unless `url` is an absolute http(s) URL.
    /// - [`ScraperError::Http`] on network, TLS or timeout failures.
    /// - [`ScraperError::UnexpectedStatus`] for anything other than `200`.
    /// - [`ScraperError::EmptyBody`] when the body is blank.
    /// - [`ScraperError::BotChallenge`] when the body is an anti-bot page.
    pub async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let target = parse_site_url(url)?;
        let response = self.client.get(target).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ScraperError::EmptyBody {
                url: url.to_owned(),
            });
        }
        if looks_like_bot_challenge(&body) {
            return Err(ScraperError::BotChallenge {
                url: url.to_owned(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl PageNavigator for HttpFetcher {
    async fn load(&self, url: &str) -> Result<String, ScraperError> {
        self.fetch(url).await
    }
}

pub(crate) fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner
        || has_challenge_platform
        || (has_just_a_moment && (has_cookie_gate || has_cf_chl))
}
