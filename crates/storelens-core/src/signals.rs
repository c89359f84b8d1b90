//! Structured output of the external collectors (map listing, social profiles).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::SocialPlatform;

/// Outcome of looking a business up on an external source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Found,
    NotFound,
    Private,
    Error,
}

impl SignalStatus {
    #[must_use]
    pub fn is_found(self) -> bool {
        matches!(self, SignalStatus::Found)
    }
}

/// What collectors know about the business before looking it up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessIdentity {
    pub name: String,
    pub url: String,
    pub location: Option<String>,
    pub socials: BTreeMap<SocialPlatform, String>,
}

impl BusinessIdentity {
    #[must_use]
    pub fn social(&self, platform: SocialPlatform) -> Option<&str> {
        self.socials
            .get(&platform)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub text: String,
    /// Star rating 0–5; 0 when the page did not expose one.
    pub stars: u8,
}

/// Reputation data from a map listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationSignal {
    pub status: SignalStatus,
    pub rating: Option<f32>,
    pub total_reviews: u32,
    pub address: String,
    pub phone: String,
    pub hours: String,
    pub reviews: Vec<Review>,
    /// Labels of complaints found in low-star reviews, first-seen order.
    pub pain_signals: Vec<String>,
    /// Labels of praise found in high-star reviews, first-seen order.
    pub praise_signals: Vec<String>,
    pub snippets: Vec<String>,
    pub error: Option<String>,
}

impl ReputationSignal {
    #[must_use]
    pub fn with_status(status: SignalStatus) -> Self {
        Self {
            status,
            rating: None,
            total_reviews: 0,
            address: String::new(),
            phone: String::new(),
            hours: String::new(),
            reviews: Vec::new(),
            pain_signals: Vec::new(),
            praise_signals: Vec::new(),
            snippets: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::with_status(SignalStatus::Error)
        }
    }
}

/// Public metrics of one social profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub platform: SocialPlatform,
    pub url: String,
    pub status: SignalStatus,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub posts: Option<u64>,
    pub likes: Option<u64>,
    pub bio: String,
    pub is_business: bool,
    pub is_verified: bool,
    pub error: Option<String>,
}

impl SocialProfile {
    #[must_use]
    pub fn new(platform: SocialPlatform, url: &str, status: SignalStatus) -> Self {
        Self {
            platform,
            url: url.to_string(),
            status,
            followers: None,
            following: None,
            posts: None,
            likes: None,
            bio: String::new(),
            is_business: false,
            is_verified: false,
            error: None,
        }
    }
}

/// Aggregated social-media presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSignal {
    pub status: SignalStatus,
    pub profiles: Vec<SocialProfile>,
    /// Presence score 0–100 computed by the collector.
    pub overall_score: u8,
    pub issues: Vec<String>,
    pub strengths: Vec<String>,
    pub snippets: Vec<String>,
    pub error: Option<String>,
}

impl SocialSignal {
    #[must_use]
    pub fn with_status(status: SignalStatus) -> Self {
        Self {
            status,
            profiles: Vec::new(),
            overall_score: 0,
            issues: Vec::new(),
            strengths: Vec::new(),
            snippets: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::with_status(SignalStatus::Error)
        }
    }
}
