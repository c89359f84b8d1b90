//! Rule-based insight synthesis.
//!
//! Fuses a web observation with optional reputation and social signals into
//! a scored [`storelens_core::Diagnosis`]. Pure and deterministic: the same
//! inputs always yield the same diagnosis.

pub mod engine;
pub mod error;
mod rules;
pub mod scoring;
pub mod solutions;
pub mod summary;

pub use engine::InsightEngine;
pub use error::SynthesisError;
