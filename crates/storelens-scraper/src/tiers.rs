//! Two-tier page acquisition with fixed escalation order.
//!
//! The light tier (plain HTTP) is always tried first. Only when its result,
//! after extraction and product-link fan-out, carries no products and no
//! business name does the manager launch a headless browser. Both tiers
//! failing is not an error: the best partial observation is returned. A URL
//! that is not absolute http(s) is never fetched by either tier.

use storelens_core::{AppConfig, FetchTier, WebObservation};

use crate::browser::ChromiumLauncher;
use crate::catalog::{detect, selectors_for};
use crate::context::ContextExtractor;
use crate::error::ScraperError;
use crate::http::HttpFetcher;
use crate::navigator::{BrowserLauncher, PageNavigator};
use crate::products::ProductExtractor;

pub struct FetchTierManager<L = ChromiumLauncher> {
    light: HttpFetcher,
    launcher: L,
    products: ProductExtractor,
    context: ContextExtractor,
}

impl FetchTierManager<ChromiumLauncher> {
    /// Builds both tiers from application config.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let light = HttpFetcher::new(config.light_timeout_secs, &config.user_agent)?;
        Ok(Self::new(
            light,
            ChromiumLauncher::from_config(config),
            config.max_product_links,
        ))
    }
}

impl<L: BrowserLauncher> FetchTierManager<L> {
    #[must_use]
    pub fn new(light: HttpFetcher, launcher: L, max_product_links: usize) -> Self {
        Self {
            light,
            launcher,
            products: ProductExtractor::new(max_product_links),
            context: ContextExtractor,
        }
    }

    /// Returns the landing-page markup and the tier that produced it.
    /// Markup is empty when both tiers failed.
    pub async fn fetch(&self, url: &str) -> (String, FetchTier) {
        let (markup, observation) = self.acquire(url).await;
        (markup, observation.tier_used)
    }

    /// Fetches `url` and extracts products and business context from it.
    pub async fn observe(&self, url: &str) -> WebObservation {
        self.acquire(url).await.1
    }

    async fn acquire(&self, url: &str) -> (String, WebObservation) {
        let mut best: Option<(String, WebObservation)> = None;

        match self.light.fetch(url).await {
            Ok(markup) => {
                let observation = self
                    .process(&markup, url, &self.light, FetchTier::Light)
                    .await;
                if !observation.is_insufficient() {
                    tracing::info!(
                        url,
                        tier = %FetchTier::Light,
                        products = observation.products.len(),
                        "fetched page"
                    );
                    return (markup, observation);
                }
                tracing::info!(url, "light tier yielded no products and no name; escalating");
                best = Some((markup, observation));
            }
            Err(ScraperError::InvalidUrl(e)) => {
                tracing::warn!(url, error = %e, "refusing to fetch malformed url");
                return (String::new(), WebObservation::empty(url));
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "light tier failed; escalating");
            }
        }

        let session = match self.launcher.launch().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(url, error = %e, "heavy tier unavailable");
                return best.unwrap_or_else(|| failed(url));
            }
        };

        let heavy = match session.load(url).await {
            Ok(markup) => {
                let observation = self
                    .process(&markup, url, &*session, FetchTier::Heavy)
                    .await;
                Some((markup, observation))
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "heavy tier navigation failed");
                None
            }
        };
        session.close().await;

        match (heavy, best) {
            (Some(heavy), _) => {
                tracing::info!(
                    url,
                    tier = %FetchTier::Heavy,
                    products = heavy.1.products.len(),
                    sufficient = !heavy.1.is_insufficient(),
                    "fetched page"
                );
                heavy
            }
            (None, Some(light)) => light,
            (None, None) => failed(url),
        }
    }

    async fn process<N>(
        &self,
        markup: &str,
        url: &str,
        navigator: &N,
        tier: FetchTier,
    ) -> WebObservation
    where
        N: PageNavigator + ?Sized,
    {
        let platform = detect(markup);
        let selectors = selectors_for(platform);
        let listing = self.products.extract(markup, url, selectors);
        let mut products = listing.products;

        for link in &listing.product_links {
            match navigator.load(link).await {
                Ok(page) => products.extend(self.products.extract_detail(&page, link, selectors)),
                Err(e) => tracing::warn!(url = %link, error = %e, "product page navigation failed"),
            }
        }

        let context = self.context.extract(markup, navigator, url).await;
        tracing::debug!(
            url,
            tier = %tier,
            platform = platform.map_or("unknown", |p| p.as_str()),
            products = products.len(),
            "processed page"
        );

        WebObservation {
            url: url.to_string(),
            platform,
            tier_used: tier,
            products,
            context,
        }
    }
}

fn failed(url: &str) -> (String, WebObservation) {
    tracing::warn!(url, "both fetch tiers failed");
    (String::new(), WebObservation::empty(url))
}
