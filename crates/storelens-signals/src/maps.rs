//! Map-listing reputation collector.
//!
//! Renders the public map search page for the business and reads rating,
//! review count and contact details. When the listing has reviews, a second
//! pass opens the reviews panel and scrolls it so the review nodes exist.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;
use scraper::{Html, Selector};
use storelens_core::{AppConfig, BusinessIdentity, ReputationSignal, Review, SignalStatus};
use storelens_scraper::dom::{compile_all, element_text, parse_selector, site_host, truncate_chars};
use storelens_scraper::{BrowserLauncher, ChromiumLauncher, PageAction};

use crate::error::SignalError;
use crate::lexicon::{detect_pain_signals, detect_praise_signals};
use crate::sources::ReputationSource;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";
const MAX_REVIEWS: usize = 15;
const MAX_REVIEW_CHARS: usize = 500;
const MAX_SNIPPETS: usize = 5;
const SNIPPET_CHARS: usize = 200;
const SETTLE_DELAY: Duration = Duration::from_secs(2);

const FIRST_RESULT: &str = "[role=\"feed\"] > div:first-child a";
const REVIEWS_BUTTON: &str = "button[aria-label*=\"reseñas\"], button[aria-label*=\"reviews\"]";
const REVIEW_FEED: &str = "[role=\"feed\"], .m6QErb.DxyBCb";
const FEED_SCROLLS: u8 = 3;

static RATING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[.,]\d)").expect("valid regex"));
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").expect("valid regex"));
static STAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)").expect("valid regex"));

struct PlaceSelectors {
    result_markers: Vec<Selector>,
    rating: Vec<Selector>,
    review_count: Vec<Selector>,
    address: Vec<Selector>,
    phone: Vec<Selector>,
    hours: Vec<Selector>,
    review: Option<Selector>,
    review_text: Option<Selector>,
    review_stars: Option<Selector>,
}

static SELECTORS: LazyLock<PlaceSelectors> = LazyLock::new(|| PlaceSelectors {
    result_markers: compile_all(&[
        "[data-value=\"Rating\"]",
        ".fontDisplayLarge",
        "button[data-item-id=\"rating\"]",
        "[aria-label*=\"estrellas\"]",
        "[aria-label*=\"stars\"]",
        "[role=\"main\"]",
    ]),
    rating: compile_all(&[
        "[aria-label*=\"estrellas\"]",
        "[aria-label*=\"stars\"]",
        ".fontDisplayLarge",
        "span[role=\"img\"][aria-label]",
    ]),
    review_count: compile_all(&[
        "button[aria-label*=\"reseñas\"]",
        "button[aria-label*=\"reviews\"]",
        "[aria-label*=\"reseñas\"]",
        "[aria-label*=\"reviews\"]",
    ]),
    address: compile_all(&["[data-item-id=\"address\"] .fontBodyMedium"]),
    phone: compile_all(&["[data-item-id^=\"phone\"] .fontBodyMedium"]),
    hours: compile_all(&[
        "[aria-label*=\"horario\"]",
        "[aria-label*=\"Horario\"]",
        "[aria-label*=\"hours\"]",
        "[aria-label*=\"Hours\"]",
    ]),
    review: parse_selector(".jftiEf, [data-review-id]"),
    review_text: parse_selector(".wiI7pd, .MyEned"),
    review_stars: parse_selector("[aria-label*=\"estrellas\"], [aria-label*=\"stars\"]"),
});

/// Builds the map search URL for a business name and optional location.
#[must_use]
pub fn search_url(name: &str, location: Option<&str>) -> String {
    let query = match location.map(str::trim).filter(|l| !l.is_empty()) {
        Some(location) => format!("{} {location}", name.trim()),
        None => name.trim().to_string(),
    };
    let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC).to_string();
    format!("{MAPS_SEARCH_URL}{encoded}")
}

/// Opens the first hit when the search lands on a result list.
#[must_use]
pub fn overview_actions() -> Vec<PageAction> {
    vec![PageAction::click(FIRST_RESULT, Duration::from_secs(2))]
}

/// Overview actions, then open the reviews panel and scroll its feed.
#[must_use]
pub fn review_actions() -> Vec<PageAction> {
    let mut actions = overview_actions();
    actions.push(PageAction::click(REVIEWS_BUTTON, Duration::from_secs(2)));
    actions.push(PageAction::scroll(
        REVIEW_FEED,
        FEED_SCROLLS,
        Duration::from_secs(1),
    ));
    actions
}

/// Reads a rendered map listing into a [`ReputationSignal`].
///
/// Returns a `not_found` signal when the page shows no place. Review text is
/// truncated and pain/praise labels are derived from the kept reviews.
#[must_use]
pub fn parse_place(markup: &str) -> ReputationSignal {
    let document = Html::parse_document(markup);
    let sel = &*SELECTORS;

    let has_results = sel
        .result_markers
        .iter()
        .any(|s| document.select(s).next().is_some());
    if !has_results {
        return ReputationSignal::with_status(SignalStatus::NotFound);
    }

    let mut signal = ReputationSignal::with_status(SignalStatus::Found);
    signal.rating = rating(&document);
    signal.total_reviews = review_count(&document);
    signal.address = first_text(&document, &sel.address);
    signal.phone = first_text(&document, &sel.phone);
    signal.hours = sel
        .hours
        .iter()
        .find_map(|s| document.select(s).next()?.value().attr("aria-label"))
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    if signal.total_reviews > 0 {
        attach_reviews(&mut signal, reviews(&document));
    }
    signal
}

/// Review nodes of an opened reviews panel.
#[must_use]
pub fn parse_reviews(markup: &str) -> Vec<Review> {
    reviews(&Html::parse_document(markup))
}

fn attach_reviews(signal: &mut ReputationSignal, reviews: Vec<Review>) {
    signal.pain_signals = detect_pain_signals(&reviews);
    signal.praise_signals = detect_praise_signals(&reviews);
    signal.snippets = reviews
        .iter()
        .take(MAX_SNIPPETS)
        .map(|r| truncate_chars(&r.text, SNIPPET_CHARS))
        .collect();
    signal.reviews = reviews;
}

/// Label or text of the first element per selector; the first one carrying
/// a `d.d` figure wins.
fn rating(document: &Html) -> Option<f32> {
    SELECTORS.rating.iter().find_map(|selector| {
        let element = document.select(selector).next()?;
        let text = element
            .value()
            .attr("aria-label")
            .map_or_else(|| element_text(element), str::to_string);
        let figure = RATING_RE.captures(&text)?.get(1)?.as_str().replace(',', ".");
        figure.parse::<f32>().ok()
    })
}

fn review_count(document: &Html) -> u32 {
    SELECTORS
        .review_count
        .iter()
        .find_map(|selector| {
            let element = document.select(selector).next()?;
            let text = element
                .value()
                .attr("aria-label")
                .map_or_else(|| element_text(element), str::to_string)
                .replace(['.', ','], "");
            DIGITS_RE.captures(&text)?.get(1)?.as_str().parse::<u32>().ok()
        })
        .unwrap_or(0)
}

fn reviews(document: &Html) -> Vec<Review> {
    let sel = &*SELECTORS;
    let (Some(review), Some(text_sel), Some(stars_sel)) =
        (&sel.review, &sel.review_text, &sel.review_stars)
    else {
        return Vec::new();
    };

    document
        .select(review)
        .take(MAX_REVIEWS)
        .filter_map(|element| {
            let text = element.select(text_sel).next().map(element_text)?;
            if text.is_empty() {
                return None;
            }
            let stars = element
                .select(stars_sel)
                .next()
                .and_then(|s| s.value().attr("aria-label"))
                .and_then(|label| STAR_RE.captures(label)?.get(1)?.as_str().parse::<u8>().ok())
                .unwrap_or(0);
            Some(Review {
                text: truncate_chars(&text, MAX_REVIEW_CHARS),
                stars,
            })
        })
        .collect()
}

fn first_text(document: &Html, selectors: &[Selector]) -> String {
    selectors
        .iter()
        .find_map(|s| document.select(s).next().map(element_text))
        .unwrap_or_default()
}

/// Browser-backed [`ReputationSource`] reading the public map listing.
pub struct MapsReputationCollector<L = ChromiumLauncher> {
    launcher: L,
}

impl MapsReputationCollector<ChromiumLauncher> {
    /// Uses the collector navigation timeout and a 2s settle delay.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let launcher = ChromiumLauncher::from_config(config)
            .with_navigation_timeout(Duration::from_secs(config.collector_nav_timeout_secs))
            .with_settle_delay(SETTLE_DELAY);
        Self::new(launcher)
    }
}

impl<L: BrowserLauncher> MapsReputationCollector<L> {
    #[must_use]
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    async fn try_collect(&self, identity: &BusinessIdentity) -> Result<ReputationSignal, SignalError> {
        let query = lookup_name(identity)?;
        let url = search_url(&query, identity.location.as_deref());

        let session = self.launcher.launch().await?;
        let overview = match session.load_with(&url, &overview_actions()).await {
            Ok(markup) => markup,
            Err(e) => {
                session.close().await;
                return Err(e.into());
            }
        };
        let mut signal = parse_place(&overview);

        if signal.status == SignalStatus::Found && signal.total_reviews > 0 {
            match session.load_with(&url, &review_actions()).await {
                Ok(panel) => {
                    let reviews = parse_reviews(&panel);
                    if !reviews.is_empty() {
                        attach_reviews(&mut signal, reviews);
                    }
                }
                Err(e) => {
                    tracing::warn!(business = %query, error = %e, "failed to open reviews panel");
                }
            }
        }
        session.close().await;

        tracing::info!(
            business = %query,
            status = ?signal.status,
            rating = ?signal.rating,
            reviews = signal.total_reviews,
            "collected map reputation"
        );
        Ok(signal)
    }
}

#[async_trait]
impl<L: BrowserLauncher> ReputationSource for MapsReputationCollector<L> {
    async fn collect(&self, identity: &BusinessIdentity) -> ReputationSignal {
        match self.try_collect(identity).await {
            Ok(signal) => signal,
            Err(e) => {
                tracing::warn!(business = %identity.name, error = %e, "map reputation lookup failed");
                ReputationSignal::failed(e.to_string())
            }
        }
    }
}

/// The business name, or the site host when no name was resolved.
fn lookup_name(identity: &BusinessIdentity) -> Result<String, SignalError> {
    let name = identity.name.trim();
    if !name.is_empty() && name != storelens_core::NAME_NOT_FOUND {
        return Ok(name.to_string());
    }
    site_host(&identity.url).ok_or_else(|| {
        SignalError::InvalidIdentity(format!(
            "no business name and no usable host in {:?}",
            identity.url
        ))
    })
}

#[cfg(test)]
#[path = "maps_test.rs"]
mod tests;
