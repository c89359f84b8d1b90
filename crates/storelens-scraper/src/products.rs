//! Product record extraction from listing and detail pages.
//!
//! Every field is resolved by an ordered list of [`TextStrategy`] values that
//! are tried in sequence until one yields text. The CSS candidates come from
//! the platform's [`SelectorSet`]; structural fallbacks (headings, currency
//! scan, leading paragraphs) follow.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use storelens_core::ProductRecord;

use crate::catalog::{SelectorSet, GENERIC_PRODUCT_LINKS};
use crate::dom::{compile_all, element_text, parse_selector, resolve_url, site_host, truncate_chars};

/// Maximum characters kept from a product description.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Maximum image URLs kept per product.
pub const MAX_IMAGES: usize = 3;

const IMAGE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src", "data-original"];

const PLACEHOLDER_MARKERS: &[&str] = &["placeholder", "loading", "spinner"];

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\$€£]\s*[\d,.]+|[\d,.]+\s*[\$€£]").expect("valid regex")
});

static HEADINGS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| compile_all(&["h1", "h2", "h3", "h4"]));

static PARAGRAPH: LazyLock<Option<Selector>> = LazyLock::new(|| parse_selector("p"));

static DETAIL_FALLBACK_CONTAINERS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| compile_all(&["main", "body"]));

/// One way of pulling a text field out of a product container.
#[derive(Debug)]
pub enum TextStrategy {
    /// First candidate selector whose element text has at least `min_chars`
    /// characters.
    Css {
        selectors: Vec<Selector>,
        min_chars: usize,
    },
    /// First non-empty `h1`..`h4`, in heading-level order.
    FirstHeading,
    /// First currency-tagged amount anywhere in the container text.
    CurrencyScan,
    /// The first `n` paragraphs joined with a space.
    LeadingParagraphs(usize),
}

impl TextStrategy {
    fn apply(&self, container: ElementRef<'_>) -> Option<String> {
        match self {
            Self::Css {
                selectors,
                min_chars,
            } => selectors.iter().find_map(|selector| {
                let text = element_text(container.select(selector).next()?);
                (text.chars().count() >= (*min_chars).max(1)).then_some(text)
            }),
            Self::FirstHeading => HEADINGS.iter().find_map(|selector| {
                let text = element_text(container.select(selector).next()?);
                (!text.is_empty()).then_some(text)
            }),
            Self::CurrencyScan => {
                let text = element_text(container);
                CURRENCY_RE
                    .find(&text)
                    .map(|m| crate::dom::normalize_whitespace(m.as_str()))
            }
            Self::LeadingParagraphs(n) => {
                let selector = PARAGRAPH.as_ref()?;
                let joined = container
                    .select(selector)
                    .take(*n)
                    .map(element_text)
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                (!joined.is_empty()).then_some(joined)
            }
        }
    }
}

fn first_match(strategies: &[TextStrategy], container: ElementRef<'_>) -> Option<String> {
    strategies.iter().find_map(|s| s.apply(container))
}

/// Compiled strategies for a single [`SelectorSet`].
#[derive(Debug)]
struct FieldPlan {
    containers: Vec<Selector>,
    name: Vec<TextStrategy>,
    price: Vec<TextStrategy>,
    description: Vec<TextStrategy>,
    images: Vec<Selector>,
    links: Vec<Selector>,
}

impl FieldPlan {
    fn compile(set: &SelectorSet) -> Self {
        Self {
            containers: compile_all(set.container),
            name: vec![
                TextStrategy::Css {
                    selectors: compile_all(set.name),
                    min_chars: 1,
                },
                TextStrategy::FirstHeading,
            ],
            price: vec![
                TextStrategy::Css {
                    selectors: compile_all(set.price),
                    min_chars: 1,
                },
                TextStrategy::CurrencyScan,
            ],
            description: vec![
                TextStrategy::Css {
                    selectors: compile_all(set.description),
                    min_chars: 11,
                },
                TextStrategy::LeadingParagraphs(2),
            ],
            images: compile_all(set.image),
            links: compile_all(set.product_link)
                .into_iter()
                .chain(compile_all(GENERIC_PRODUCT_LINKS))
                .collect(),
        }
    }

    fn record(&self, container: ElementRef<'_>, base_url: &str) -> Option<ProductRecord> {
        let name = first_match(&self.name, container)?;
        let description = first_match(&self.description, container)
            .map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS))
            .unwrap_or_default();
        Some(ProductRecord {
            name,
            price: first_match(&self.price, container).unwrap_or_default(),
            description,
            image_urls: self.image_urls(container, base_url),
        })
    }

    fn image_urls(&self, container: ElementRef<'_>, base_url: &str) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for selector in &self.images {
            for img in container.select(selector) {
                let Some(url) = IMAGE_ATTRS
                    .iter()
                    .filter_map(|attr| img.value().attr(attr))
                    .find_map(|raw| resolve_url(base_url, raw))
                else {
                    continue;
                };
                let lower = url.to_ascii_lowercase();
                if PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m)) {
                    continue;
                }
                if !urls.contains(&url) {
                    urls.push(url);
                }
                if urls.len() == MAX_IMAGES {
                    return urls;
                }
            }
        }
        urls
    }
}

/// Output of a listing-page extraction.
#[derive(Debug, Clone, Default)]
pub struct ProductExtraction {
    pub products: Vec<ProductRecord>,
    /// Number of container elements matched by the winning selector.
    pub container_count: usize,
    /// Same-site product detail URLs to visit. Only populated when no
    /// container matched.
    pub product_links: Vec<String>,
}

/// Extracts [`ProductRecord`]s using a platform selector set.
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    max_product_links: usize,
}

impl Default for ProductExtractor {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProductExtractor {
    #[must_use]
    pub fn new(max_product_links: usize) -> Self {
        Self { max_product_links }
    }

    /// Extracts products from a listing page.
    ///
    /// When no container selector matches, the result carries up to
    /// `max_product_links` same-site product URLs for the caller to visit.
    #[must_use]
    pub fn extract(&self, markup: &str, base_url: &str, set: &SelectorSet) -> ProductExtraction {
        let document = Html::parse_document(markup);
        let plan = FieldPlan::compile(set);

        let containers = find_containers(&document, &plan.containers);
        if containers.is_empty() {
            let product_links = self.product_links(&document, base_url, &plan.links);
            tracing::debug!(
                base_url,
                links = product_links.len(),
                "no product containers matched; collected detail links"
            );
            return ProductExtraction {
                products: Vec::new(),
                container_count: 0,
                product_links,
            };
        }

        let container_count = containers.len();
        let products = containers
            .into_iter()
            .filter_map(|c| plan.record(c, base_url))
            .collect::<Vec<_>>();
        tracing::debug!(
            base_url,
            containers = container_count,
            products = products.len(),
            "extracted listing products"
        );
        ProductExtraction {
            products,
            container_count,
            product_links: Vec::new(),
        }
    }

    /// Extracts products from a single product detail page.
    ///
    /// Falls back to treating `main` (or `body`) as the only container when
    /// no container selector matches. Never mines further links.
    #[must_use]
    pub fn extract_detail(
        &self,
        markup: &str,
        page_url: &str,
        set: &SelectorSet,
    ) -> Vec<ProductRecord> {
        let document = Html::parse_document(markup);
        let plan = FieldPlan::compile(set);

        let mut containers = find_containers(&document, &plan.containers);
        if containers.is_empty() {
            containers = DETAIL_FALLBACK_CONTAINERS
                .iter()
                .find_map(|s| document.select(s).next())
                .into_iter()
                .collect();
        }
        containers
            .into_iter()
            .filter_map(|c| plan.record(c, page_url))
            .collect()
    }

    fn product_links(&self, document: &Html, base_url: &str, selectors: &[Selector]) -> Vec<String> {
        let Some(base_host) = site_host(base_url) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for selector in selectors {
            for anchor in document.select(selector) {
                if links.len() >= self.max_product_links {
                    return links;
                }
                let Some(url) = anchor
                    .value()
                    .attr("href")
                    .and_then(|href| resolve_url(base_url, href))
                else {
                    continue;
                };
                if site_host(&url).as_deref() != Some(base_host.as_str()) {
                    continue;
                }
                let key = url.split('#').next().unwrap_or(&url).to_string();
                if seen.insert(key.clone()) {
                    links.push(key);
                }
            }
        }
        links
    }
}

fn find_containers<'a>(document: &'a Html, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    selectors
        .iter()
        .map(|s| document.select(s).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
