//! Collector seams consumed by the investigation pipeline.

use async_trait::async_trait;
use storelens_core::{BusinessIdentity, ReputationSignal, SocialSignal};

/// Looks a business up on a map listing.
///
/// Implementations never fail outright: unreachable sources come back as a
/// signal with [`storelens_core::SignalStatus::Error`].
#[async_trait]
pub trait ReputationSource: Send + Sync {
    async fn collect(&self, identity: &BusinessIdentity) -> ReputationSignal;
}

/// Analyses the social profiles linked from a business's website.
#[async_trait]
pub trait SocialSource: Send + Sync {
    async fn collect(&self, identity: &BusinessIdentity) -> SocialSignal;
}
