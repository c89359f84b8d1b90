//! Storefront acquisition and extraction.
//!
//! [`FetchTierManager`] fetches a site with a light HTTP tier, escalates to a
//! headless browser when needed, and turns the markup into a
//! [`storelens_core::WebObservation`] via the product and context extractors.

pub mod browser;
pub mod catalog;
pub mod context;
pub mod dom;
pub mod error;
pub mod http;
pub mod navigator;
pub mod products;
pub mod tiers;

pub use browser::{ChromiumLauncher, ChromiumSession};
pub use catalog::{business_selectors, detect, selectors_for, BusinessSelectors, SelectorSet};
pub use context::ContextExtractor;
pub use error::ScraperError;
pub use http::HttpFetcher;
pub use navigator::{BrowserLauncher, BrowserSession, PageAction, PageNavigator};
pub use products::{ProductExtraction, ProductExtractor, TextStrategy};
pub use tiers::FetchTierManager;
