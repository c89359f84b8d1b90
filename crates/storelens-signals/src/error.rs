use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("browser error: {0}")]
    Browser(#[from] storelens_scraper::ScraperError),

    #[error("cannot build a lookup for this business: {0}")]
    InvalidIdentity(String),
}
