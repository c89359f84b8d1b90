//! External-signal collectors for storelens.
//!
//! A map-listing reputation collector and an Instagram/Facebook profile
//! collector, both rendering pages through a headless browser and folding
//! every failure into the returned signal's status.

pub mod error;
pub mod lexicon;
pub mod maps;
pub mod numbers;
pub mod social;
pub mod sources;

pub use error::SignalError;
pub use lexicon::{detect_pain_signals, detect_praise_signals};
pub use maps::MapsReputationCollector;
pub use numbers::parse_social_number;
pub use social::ProfileSocialCollector;
pub use sources::{ReputationSource, SocialSource};
