use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings for an investigation run.
///
/// Timeouts are per navigation, not per investigation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub targets_path: PathBuf,
    pub user_agent: String,
    pub light_timeout_secs: u64,
    pub heavy_timeout_secs: u64,
    pub settle_delay_ms: u64,
    pub max_product_links: usize,
    pub collector_timeout_secs: u64,
    pub collector_nav_timeout_secs: u64,
    pub chromium_path: Option<PathBuf>,
    pub headless: bool,
}

impl AppConfig {
    /// Settings used by tests and by callers that skip env loading.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            env: Environment::Development,
            log_level: "info".to_string(),
            targets_path: PathBuf::from("./config/targets.yaml"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            light_timeout_secs: 15,
            heavy_timeout_secs: 45,
            settle_delay_ms: 3000,
            max_product_links: 10,
            collector_timeout_secs: 90,
            collector_nav_timeout_secs: 15,
            chromium_path: None,
            headless: true,
        }
    }
}

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
