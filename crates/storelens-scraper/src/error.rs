use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },

    #[error("bot challenge page served by {url}")]
    BotChallenge { url: String },

    #[error(transparent)]
    InvalidUrl(#[from] storelens_core::InvalidUrl),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("navigation to {url} timed out after {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },
}
