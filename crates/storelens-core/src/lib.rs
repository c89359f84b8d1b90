//! Shared domain model and configuration for storelens.
//!
//! Everything an investigation produces or consumes is defined here as plain
//! data: product and context observations, external signals, insights and the
//! final diagnosis.

pub mod app_config;
pub mod config;
pub mod context;
pub mod diagnosis;
pub mod products;
pub mod signals;
pub mod targets;
pub mod urls;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use context::{BusinessContext, ContactInfo, FaqEntry, Policies, SocialPlatform, NAME_NOT_FOUND};
pub use diagnosis::{Diagnosis, Insight, InsightCategory, InsightKind};
pub use products::{FetchTier, Platform, ProductRecord, WebObservation};
pub use signals::{
    BusinessIdentity, ReputationSignal, Review, SignalStatus, SocialProfile, SocialSignal,
};
pub use targets::{load_targets, Target, TargetsFile};
pub use urls::{parse_site_url, site_host, InvalidUrl};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read targets file {path}: {source}")]
    TargetsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse targets file: {0}")]
    TargetsFileParse(#[from] serde_yaml::Error),

    #[error("targets validation failed: {0}")]
    Validation(String),
}
