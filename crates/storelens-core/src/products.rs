use serde::{Deserialize, Serialize};

use crate::context::BusinessContext;

/// A product scraped from a storefront listing or detail page.
///
/// Extractors never emit a record with an empty `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    /// Price text as shown on the page, e.g. `"$ 12.500"`. Only whitespace is
    /// normalized; currency parsing is left to consumers.
    pub price: String,
    /// At most 500 characters.
    pub description: String,
    /// Absolute image URLs, at most three, placeholders removed.
    pub image_urls: Vec<String>,
}

impl ProductRecord {
    #[must_use]
    pub fn has_images(&self) -> bool {
        !self.image_urls.is_empty()
    }

    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// E-commerce platform recognized from markup signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Shopify,
    WooCommerce,
    TiendaNube,
    MercadoShops,
    Vtex,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Shopify => "shopify",
            Platform::WooCommerce => "woocommerce",
            Platform::TiendaNube => "tiendanube",
            Platform::MercadoShops => "mercadoshops",
            Platform::Vtex => "vtex",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which fetch strategy produced the markup behind an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchTier {
    Light,
    Heavy,
    Failed,
}

impl std::fmt::Display for FetchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchTier::Light => write!(f, "light"),
            FetchTier::Heavy => write!(f, "heavy"),
            FetchTier::Failed => write!(f, "failed"),
        }
    }
}

/// Everything learned from the business's own website.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebObservation {
    pub url: String,
    pub platform: Option<Platform>,
    pub tier_used: FetchTier,
    pub products: Vec<ProductRecord>,
    pub context: BusinessContext,
}

impl WebObservation {
    /// An observation for a site that could not be fetched by any tier.
    #[must_use]
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            platform: None,
            tier_used: FetchTier::Failed,
            products: Vec::new(),
            context: BusinessContext::empty(url),
        }
    }

    /// `true` when the observation carries neither products nor a business name.
    #[must_use]
    pub fn is_insufficient(&self) -> bool {
        self.products.is_empty() && !self.context.has_name()
    }
}
