use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
}
