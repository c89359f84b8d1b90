use storelens_core::InvalidUrl;
use storelens_intel::SynthesisError;
use storelens_scraper::ScraperError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed input: {0}")]
    InvalidUrl(#[from] InvalidUrl),

    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("failed to build fetcher: {0}")]
    Scraper(#[from] ScraperError),

    #[error("investigation cancelled")]
    Cancelled,
}
