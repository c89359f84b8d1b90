//! Social-profile collector for Instagram and Facebook pages.
//!
//! Each linked profile is rendered once and parsed into a [`SocialProfile`].
//! The collector then scores overall presence from 50 and lists issues and
//! strengths as short English sentences.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use storelens_core::{
    AppConfig, BusinessIdentity, SignalStatus, SocialPlatform, SocialProfile, SocialSignal,
};
use storelens_scraper::dom::{compile_all, element_text, truncate_chars};
use storelens_scraper::{BrowserLauncher, ChromiumLauncher};

use crate::numbers::parse_social_number;
use crate::sources::SocialSource;

const MAX_BIO_CHARS: usize = 300;
const SETTLE_DELAY: Duration = Duration::from_secs(2);
const BASE_SCORE: i32 = 50;

const INSTAGRAM_PRIVATE_MARKERS: &[&str] = &["esta cuenta es privada", "this account is private"];
const NOT_AVAILABLE_MARKERS: &[&str] = &[
    "sorry, this page isn't available",
    "esta página no está disponible",
    "this content isn't available",
    "este contenido no está disponible",
];

const COUNTER: &str = r"(\d+(?:[.,]\d+)*\s*(?:mil\b|[kmb]\b)?)";

static OG_FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| counter_re("followers|seguidores"));
static OG_FOLLOWING_RE: LazyLock<Regex> = LazyLock::new(|| counter_re("following|seguidos"));
static OG_POSTS_RE: LazyLock<Regex> = LazyLock::new(|| counter_re("posts|publicaciones"));
static FB_LIKES_RE: LazyLock<Regex> = LazyLock::new(|| counter_re("me gusta|likes"));
static FB_FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| counter_re("seguidores|followers"));

fn counter_re(labels: &str) -> Regex {
    Regex::new(&format!(r"(?i){COUNTER}\s*(?:{labels})")).expect("valid regex")
}

struct ProfileSelectors {
    ig_profile_markers: Vec<Selector>,
    ig_stats: Vec<Selector>,
    ig_bio: Vec<Selector>,
    ig_business: Vec<Selector>,
    og_description: Vec<Selector>,
    fb_name: Vec<Selector>,
    fb_main: Vec<Selector>,
    fb_verified: Vec<Selector>,
    body: Vec<Selector>,
    button: Vec<Selector>,
}

static SELECTORS: LazyLock<ProfileSelectors> = LazyLock::new(|| ProfileSelectors {
    ig_profile_markers: compile_all(&["article", "[role=\"tablist\"]", "header section"]),
    ig_stats: compile_all(&["header section ul li"]),
    ig_bio: compile_all(&["header section > div:nth-child(3)"]),
    ig_business: compile_all(&[
        "[href*=\"mailto:\"]",
        "[href*=\"tel:\"]",
        "header a[href*=\"/explore/locations/\"]",
    ]),
    og_description: compile_all(&["meta[property=\"og:description\"]"]),
    fb_name: compile_all(&["h1"]),
    fb_main: compile_all(&["[role=\"main\"]"]),
    fb_verified: compile_all(&["[aria-label*=\"verificado\"]", "[aria-label*=\"verified\"]"]),
    body: compile_all(&["body"]),
    button: compile_all(&["button"]),
});

/// Normalizes a bare handle (`"@cafetano"`) into a profile URL.
#[must_use]
pub fn profile_url(platform: SocialPlatform, link: &str) -> String {
    let link = link.trim();
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }
    let handle = link.trim_start_matches('@');
    match platform {
        SocialPlatform::Instagram => format!("https://www.instagram.com/{handle}"),
        SocialPlatform::Facebook => format!("https://www.facebook.com/{handle}"),
        SocialPlatform::Twitter => format!("https://x.com/{handle}"),
        SocialPlatform::LinkedIn => format!("https://www.linkedin.com/company/{handle}"),
    }
}

/// Parses a rendered Instagram profile page.
#[must_use]
pub fn parse_instagram(markup: &str, url: &str) -> SocialProfile {
    let document = Html::parse_document(markup);
    let sel = &*SELECTORS;
    let page_text = document_text(&document).to_lowercase();

    if INSTAGRAM_PRIVATE_MARKERS.iter().any(|m| page_text.contains(m)) {
        return SocialProfile::new(SocialPlatform::Instagram, url, SignalStatus::Private);
    }
    if NOT_AVAILABLE_MARKERS.iter().any(|m| page_text.contains(m)) {
        return SocialProfile::new(SocialPlatform::Instagram, url, SignalStatus::NotFound);
    }

    let og_description = first_attr(&document, &sel.og_description, "content");
    let has_profile = sel
        .ig_profile_markers
        .iter()
        .any(|s| document.select(s).next().is_some());
    if !has_profile && og_description.is_none() {
        return SocialProfile::new(SocialPlatform::Instagram, url, SignalStatus::NotFound);
    }

    let mut profile = SocialProfile::new(SocialPlatform::Instagram, url, SignalStatus::Found);
    for stat in sel.ig_stats.iter().flat_map(|s| document.select(s)) {
        let text = element_text(stat).to_lowercase();
        let number = parse_social_number(&text);
        if text.contains("publicacion") || text.contains("post") {
            profile.posts = number;
        } else if text.contains("seguidor") || text.contains("follower") {
            profile.followers = number;
        } else if text.contains("seguido") || text.contains("following") {
            profile.following = number;
        }
    }

    if let Some(description) = og_description.as_deref() {
        profile.followers = profile.followers.or_else(|| counter(&OG_FOLLOWERS_RE, description));
        profile.following = profile.following.or_else(|| counter(&OG_FOLLOWING_RE, description));
        profile.posts = profile.posts.or_else(|| counter(&OG_POSTS_RE, description));
    }

    profile.bio = sel
        .ig_bio
        .iter()
        .find_map(|s| document.select(s).next().map(element_text))
        .map(|bio| truncate_chars(&bio, MAX_BIO_CHARS))
        .unwrap_or_default();

    let has_contact = sel
        .ig_business
        .iter()
        .any(|s| document.select(s).next().is_some());
    let has_contact_button = sel.button.iter().flat_map(|s| document.select(s)).any(|b| {
        let label = element_text(b).to_lowercase();
        label.contains("contactar") || label.contains("contact")
    });
    profile.is_business = has_contact || has_contact_button;
    profile
}

/// Parses a rendered Facebook page. Returns the profile and the page name.
#[must_use]
pub fn parse_facebook(markup: &str, url: &str) -> (SocialProfile, Option<String>) {
    let document = Html::parse_document(markup);
    let sel = &*SELECTORS;

    let name = sel
        .fb_name
        .iter()
        .find_map(|s| document.select(s).next().map(element_text))
        .filter(|n| !n.is_empty());
    let has_main = sel.fb_main.iter().any(|s| document.select(s).next().is_some());
    if name.is_none() || !has_main {
        return (
            SocialProfile::new(SocialPlatform::Facebook, url, SignalStatus::NotFound),
            None,
        );
    }

    let mut profile = SocialProfile::new(SocialPlatform::Facebook, url, SignalStatus::Found);
    let text = document_text(&document);
    profile.likes = counter(&FB_LIKES_RE, &text);
    profile.followers = counter(&FB_FOLLOWERS_RE, &text);
    profile.is_verified = sel
        .fb_verified
        .iter()
        .any(|s| document.select(s).next().is_some());
    (profile, name)
}

/// Overall presence score (0–100, base 50) plus issues and strengths.
///
/// `None` means the platform was not linked at all.
#[must_use]
pub fn calculate_score(
    instagram: Option<&SocialProfile>,
    facebook: Option<&SocialProfile>,
) -> (u8, Vec<String>, Vec<String>) {
    let mut score = BASE_SCORE;
    let mut issues = Vec::new();
    let mut strengths = Vec::new();

    match instagram {
        Some(ig) if ig.status.is_found() => {
            match ig.followers {
                Some(f) if f > 10_000 => {
                    score += 20;
                    strengths.push("Strong Instagram audience (10K+ followers)".to_string());
                }
                Some(f) if f > 1_000 => {
                    score += 10;
                    strengths.push("Moderate Instagram audience".to_string());
                }
                Some(_) => score += 5,
                None => {}
            }
            if ig.posts.is_some_and(|p| p < 10) {
                score -= 10;
                issues.push("Low Instagram activity (fewer than 10 posts)".to_string());
            }
        }
        Some(ig) if matches!(ig.status, SignalStatus::Private | SignalStatus::NotFound) => {
            score -= 5;
            issues.push("Instagram profile is private or not found".to_string());
        }
        Some(_) => {}
        None => {
            score -= 10;
            issues.push("No Instagram presence detected".to_string());
        }
    }

    match facebook {
        Some(fb) if fb.status.is_found() => {
            if fb.followers.is_some_and(|f| f > 5_000) {
                score += 15;
                strengths.push("Active Facebook community".to_string());
            }
            if fb.is_verified {
                score += 10;
                strengths.push("Verified Facebook page".to_string());
            }
        }
        Some(_) => {
            score -= 5;
            issues.push("Facebook page is not accessible".to_string());
        }
        None => {
            score -= 10;
            issues.push("No Facebook presence detected".to_string());
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = score.clamp(0, 100) as u8;
    (score, issues, strengths)
}

/// Browser-backed [`SocialSource`] for the Instagram and Facebook links
/// found on the business's website.
pub struct ProfileSocialCollector<L = ChromiumLauncher> {
    launcher: L,
}

impl ProfileSocialCollector<ChromiumLauncher> {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let launcher = ChromiumLauncher::from_config(config)
            .with_navigation_timeout(Duration::from_secs(config.collector_nav_timeout_secs))
            .with_settle_delay(SETTLE_DELAY);
        Self::new(launcher)
    }
}

impl<L: BrowserLauncher> ProfileSocialCollector<L> {
    #[must_use]
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }
}

#[async_trait]
impl<L: BrowserLauncher> SocialSource for ProfileSocialCollector<L> {
    async fn collect(&self, identity: &BusinessIdentity) -> SocialSignal {
        let instagram_url = identity
            .social(SocialPlatform::Instagram)
            .map(|l| profile_url(SocialPlatform::Instagram, l));
        let facebook_url = identity
            .social(SocialPlatform::Facebook)
            .map(|l| profile_url(SocialPlatform::Facebook, l));

        if instagram_url.is_none() && facebook_url.is_none() {
            tracing::debug!(business = %identity.name, "no social links to analyse");
            return SocialSignal::with_status(SignalStatus::NotFound);
        }

        let session = match self.launcher.launch().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(business = %identity.name, error = %e, "social analysis unavailable");
                return SocialSignal::failed(e.to_string());
            }
        };

        let mut snippets = Vec::new();
        let instagram = match &instagram_url {
            Some(url) => Some(match session.load(url).await {
                Ok(markup) => parse_instagram(&markup, url),
                Err(e) => failed_profile(SocialPlatform::Instagram, url, &e),
            }),
            None => None,
        };
        let facebook = match &facebook_url {
            Some(url) => Some(match session.load(url).await {
                Ok(markup) => {
                    let (profile, name) = parse_facebook(&markup, url);
                    if let Some(name) = name {
                        snippets.push(format!("Facebook page: {name}"));
                    }
                    profile
                }
                Err(e) => failed_profile(SocialPlatform::Facebook, url, &e),
            }),
            None => None,
        };
        session.close().await;

        if let Some(bio) = instagram.as_ref().map(|p| p.bio.as_str()).filter(|b| !b.is_empty()) {
            snippets.insert(0, format!("Instagram bio: {bio}"));
        }

        let (overall_score, issues, strengths) =
            calculate_score(instagram.as_ref(), facebook.as_ref());
        let profiles: Vec<SocialProfile> = instagram.into_iter().chain(facebook).collect();

        let all_errored = profiles.iter().all(|p| p.status == SignalStatus::Error);
        let status = if all_errored {
            SignalStatus::Error
        } else {
            SignalStatus::Found
        };
        tracing::info!(
            business = %identity.name,
            status = ?status,
            score = overall_score,
            profiles = profiles.len(),
            "collected social presence"
        );

        SocialSignal {
            status,
            profiles,
            overall_score,
            issues,
            strengths,
            snippets,
            error: all_errored.then(|| "every social profile failed to load".to_string()),
        }
    }
}

fn failed_profile(
    platform: SocialPlatform,
    url: &str,
    error: &storelens_scraper::ScraperError,
) -> SocialProfile {
    tracing::warn!(url, error = %error, "social profile navigation failed");
    SocialProfile {
        error: Some(error.to_string()),
        ..SocialProfile::new(platform, url, SignalStatus::Error)
    }
}

fn counter(re: &Regex, text: &str) -> Option<u64> {
    let caps = re.captures(text)?;
    parse_social_number(caps.get(1)?.as_str())
}

fn document_text(document: &Html) -> String {
    SELECTORS
        .body
        .iter()
        .find_map(|s| document.select(s).next().map(element_text))
        .unwrap_or_default()
}

fn first_attr(document: &Html, selectors: &[Selector], attr: &str) -> Option<String> {
    selectors.iter().find_map(|s| {
        let value = document.select(s).next()?.value().attr(attr)?.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
#[path = "social_test.rs"]
mod tests;
