use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Business name placeholder used when no naming source matched.
pub const NAME_NOT_FOUND: &str = "Name not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    Facebook,
    Twitter,
    LinkedIn,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 4] = [
        SocialPlatform::Instagram,
        SocialPlatform::Facebook,
        SocialPlatform::Twitter,
        SocialPlatform::LinkedIn,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::Twitter => "Twitter",
            SocialPlatform::LinkedIn => "LinkedIn",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phones: BTreeSet<String>,
    pub emails: BTreeSet<String>,
    pub address: String,
}

/// Policy page links. Empty string means the link was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policies {
    pub shipping: String,
    pub returns: String,
    pub terms: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Business metadata scraped from a website.
///
/// Every known social platform is always present in `socials`; a platform
/// that was not linked maps to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessContext {
    pub url: String,
    pub name: String,
    pub contact: ContactInfo,
    pub socials: BTreeMap<SocialPlatform, String>,
    pub policies: Policies,
    /// About-page text and meta description; empty when neither was found.
    pub summary: String,
    pub faq: Vec<FaqEntry>,
}

impl BusinessContext {
    #[must_use]
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            name: NAME_NOT_FOUND.to_string(),
            contact: ContactInfo::default(),
            socials: empty_socials(),
            policies: Policies::default(),
            summary: String::new(),
            faq: Vec::new(),
        }
    }

    /// `true` when a real business name was resolved.
    #[must_use]
    pub fn has_name(&self) -> bool {
        let name = self.name.trim();
        !name.is_empty() && name != NAME_NOT_FOUND
    }

    #[must_use]
    pub fn social(&self, platform: SocialPlatform) -> &str {
        self.socials.get(&platform).map_or("", String::as_str)
    }

    #[must_use]
    pub fn has_any_social(&self) -> bool {
        self.socials.values().any(|url| !url.trim().is_empty())
    }

    /// Sets a social link, keeping the first one found for each platform.
    pub fn set_social_if_empty(&mut self, platform: SocialPlatform, url: &str) {
        let slot = self.socials.entry(platform).or_default();
        if slot.is_empty() {
            url.trim().clone_into(slot);
        }
    }
}

fn empty_socials() -> BTreeMap<SocialPlatform, String> {
    SocialPlatform::ALL
        .into_iter()
        .map(|p| (p, String::new()))
        .collect()
}
