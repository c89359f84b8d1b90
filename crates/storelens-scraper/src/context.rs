//! Business metadata extraction: name, contact channels, social links,
//! policies, about text and FAQ.
//!
//! Everything is best effort. A lookup that finds nothing leaves the field
//! empty; a failed secondary navigation is logged and ignored.
//!
//! Parsing happens in synchronous passes that return owned data, so no
//! parsed document is ever held across an `.await`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use storelens_core::{BusinessContext, FaqEntry, SocialPlatform, NAME_NOT_FOUND};

use crate::catalog::business_selectors;
use crate::dom::{
    compile_all, element_text, parse_selector, resolve_url, site_host, truncate_chars,
};
use crate::navigator::PageNavigator;

const MAX_ABOUT_CHARS: usize = 1000;
const ABOUT_PARAGRAPHS: usize = 5;
const MAX_FAQ_ITEMS: usize = 10;

static TITLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[-|–]\s*.*$").expect("valid regex"));

static WHATSAPP_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:phone=|wa\.me/)\+?(\d+)").expect("valid regex"));

struct Compiled {
    title: Vec<Selector>,
    og_site_name: Vec<Selector>,
    meta_description: Vec<Selector>,
    h1: Vec<Selector>,
    paragraph: Vec<Selector>,
    logo_alt: Vec<Selector>,
    phone: Vec<Selector>,
    email: Vec<Selector>,
    address: Vec<Selector>,
    socials: Vec<(SocialPlatform, Vec<Selector>)>,
    about: Vec<Selector>,
    about_main: Vec<Selector>,
    faq: Vec<Selector>,
    faq_item: Option<Selector>,
    faq_question: Option<Selector>,
    faq_answer: Option<Selector>,
    shipping: Vec<Selector>,
    returns: Vec<Selector>,
    terms: Vec<Selector>,
}

static SELECTORS: LazyLock<Compiled> = LazyLock::new(|| {
    let b = business_selectors();
    Compiled {
        title: compile_all(&["title"]),
        og_site_name: compile_all(&["meta[property=\"og:site_name\"]"]),
        meta_description: compile_all(&["meta[name=\"description\"]"]),
        h1: compile_all(&["h1"]),
        paragraph: compile_all(&["p"]),
        logo_alt: compile_all(b.logo_alt),
        phone: compile_all(b.phone),
        email: compile_all(b.email),
        address: compile_all(b.address),
        socials: vec![
            (SocialPlatform::Instagram, compile_all(b.instagram)),
            (SocialPlatform::Facebook, compile_all(b.facebook)),
            (SocialPlatform::Twitter, compile_all(b.twitter)),
            (SocialPlatform::LinkedIn, compile_all(b.linkedin)),
        ],
        about: compile_all(b.about),
        about_main: compile_all(&["main", ".main", "#main", ".content", "article"]),
        faq: compile_all(b.faq),
        faq_item: parse_selector(".faq-item, .faq-question, [itemtype*=\"Question\"]"),
        faq_question: parse_selector(".question, h3, h4, strong, [itemprop=\"name\"]"),
        faq_answer: parse_selector(".answer, p, [itemprop=\"text\"]"),
        shipping: compile_all(b.shipping),
        returns: compile_all(b.returns),
        terms: compile_all(b.terms),
    }
});

/// A section that was either read from the landing page or needs one more
/// navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Section<T> {
    Ready(T),
    Fetch(String),
}

/// Result of the synchronous pass over the landing page.
#[derive(Debug)]
struct Scan {
    context: BusinessContext,
    meta_description: Option<String>,
    about: Option<Section<String>>,
    faq: Option<Section<Vec<FaqEntry>>>,
}

/// Extracts a [`BusinessContext`] from a landing page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextExtractor;

impl ContextExtractor {
    /// Extracts business metadata from `markup`, using `navigator` for at
    /// most one about-page and one FAQ-page navigation.
    pub async fn extract<N>(&self, markup: &str, navigator: &N, base_url: &str) -> BusinessContext
    where
        N: PageNavigator + ?Sized,
    {
        let Scan {
            mut context,
            meta_description,
            about,
            faq,
        } = scan(markup, base_url);

        let about_text = match about {
            Some(Section::Ready(text)) => Some(text),
            Some(Section::Fetch(url)) => match navigator.load(&url).await {
                Ok(page) => about_from_page(&page),
                Err(e) => {
                    tracing::warn!(url, error = %e, "about page navigation failed");
                    None
                }
            },
            None => None,
        };
        context.summary = [about_text, meta_description]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        context.faq = match faq {
            Some(Section::Ready(entries)) => entries,
            Some(Section::Fetch(url)) => match navigator.load(&url).await {
                Ok(page) => faq_from_page(&page),
                Err(e) => {
                    tracing::warn!(url, error = %e, "FAQ page navigation failed");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        tracing::debug!(
            base_url,
            name = %context.name,
            phones = context.contact.phones.len(),
            emails = context.contact.emails.len(),
            faq = context.faq.len(),
            "extracted business context"
        );
        context
    }
}

fn scan(markup: &str, base_url: &str) -> Scan {
    let document = Html::parse_document(markup);
    let sel = &*SELECTORS;

    let mut context = BusinessContext::empty(base_url);
    context.name = business_name(&document);

    collect_phones(&document, &mut context);
    collect_emails(&document, &mut context);
    context.contact.address = first_text(&document, &sel.address).unwrap_or_default();

    for (platform, selectors) in &sel.socials {
        if let Some(href) = first_href(&document, selectors) {
            context.set_social_if_empty(*platform, &href);
        }
    }

    context.policies.shipping = policy_link(&document, &sel.shipping, base_url);
    context.policies.returns = policy_link(&document, &sel.returns, base_url);
    context.policies.terms = policy_link(&document, &sel.terms, base_url);

    let about = locate_section(&document, &sel.about, base_url).map(|found| match found {
        Located::Remote(url) => Section::Fetch(url),
        Located::Local(el) => Section::Ready(section_text(el)),
    });
    let faq = locate_section(&document, &sel.faq, base_url).map(|found| match found {
        Located::Remote(url) => Section::Fetch(url),
        Located::Local(el) => Section::Ready(faq_entries(el)),
    });

    Scan {
        context,
        meta_description: first_attr(&document, &sel.meta_description, "content"),
        about,
        faq,
    }
}

fn business_name(document: &Html) -> String {
    let sel = &*SELECTORS;
    let from_title = first_text(document, &sel.title)
        .map(|title| TITLE_SUFFIX_RE.replace(&title, "").trim().to_string())
        .filter(|name| !name.is_empty());

    from_title
        .or_else(|| first_attr(document, &sel.og_site_name, "content"))
        .or_else(|| first_attr(document, &sel.logo_alt, "alt"))
        .or_else(|| first_text(document, &sel.h1))
        .unwrap_or_else(|| NAME_NOT_FOUND.to_string())
}

fn collect_phones(document: &Html, context: &mut BusinessContext) {
    for selector in &SELECTORS.phone {
        for link in document.select(selector) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let lower = href.to_ascii_lowercase();
            if let Some(number) = lower.strip_prefix("tel:") {
                let number = crate::dom::normalize_whitespace(number);
                if !number.is_empty() {
                    context.contact.phones.insert(number);
                }
            } else if lower.contains("whatsapp") || lower.contains("wa.me") {
                let entry = WHATSAPP_NUMBER_RE
                    .captures(href)
                    .and_then(|c| c.get(1))
                    .map_or_else(
                        || "WhatsApp".to_string(),
                        |m| format!("WhatsApp: {}", m.as_str()),
                    );
                context.contact.phones.insert(entry);
            }
        }
    }
}

fn collect_emails(document: &Html, context: &mut BusinessContext) {
    for selector in &SELECTORS.email {
        for link in document.select(selector) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let Some(rest) = href
                .strip_prefix("mailto:")
                .or_else(|| href.strip_prefix("MAILTO:"))
            else {
                continue;
            };
            let address = rest.split('?').next().unwrap_or_default().trim();
            if !address.is_empty() {
                context.contact.emails.insert(address.to_string());
            }
        }
    }
}

fn policy_link(document: &Html, selectors: &[Selector], base_url: &str) -> String {
    first_href(document, selectors)
        .map(|href| resolve_url(base_url, &href).unwrap_or(href))
        .unwrap_or_default()
}

enum Located<'a> {
    Local(ElementRef<'a>),
    Remote(String),
}

/// Finds the first candidate, in selector order, whose content lives on this
/// page or behind a link to the same site. Links to other hosts are skipped.
fn locate_section<'a>(
    document: &'a Html,
    selectors: &[Selector],
    base_url: &str,
) -> Option<Located<'a>> {
    let home = site_host(base_url);
    selectors
        .iter()
        .flat_map(|s| document.select(s))
        .find_map(|element| classify(document, element, base_url, home.as_deref()))
}

fn classify<'a>(
    document: &'a Html,
    element: ElementRef<'a>,
    base_url: &str,
    home: Option<&str>,
) -> Option<Located<'a>> {
    let Some(href) = element.value().attr("href") else {
        return Some(Located::Local(element));
    };
    let href = href.trim();
    if let Some(id) = href.strip_prefix('#') {
        let target = parse_selector(&format!("[id=\"{id}\"]"))?;
        return document.select(&target).next().map(Located::Local);
    }
    let url = resolve_url(base_url, href)?;
    if home.is_some() && site_host(&url).as_deref() == home {
        Some(Located::Remote(url))
    } else {
        tracing::debug!(url = %url, "skipping off-site section link");
        None
    }
}

fn section_text(section: ElementRef<'_>) -> String {
    let paragraphs = SELECTORS
        .paragraph
        .iter()
        .flat_map(|s| section.select(s))
        .take(ABOUT_PARAGRAPHS)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();
    let text = if paragraphs.is_empty() {
        element_text(section)
    } else {
        paragraphs.join(" ")
    };
    truncate_chars(&text, MAX_ABOUT_CHARS)
}

fn about_from_page(markup: &str) -> Option<String> {
    let document = Html::parse_document(markup);
    let main = SELECTORS
        .about_main
        .iter()
        .find_map(|s| document.select(s).next())?;
    let text = SELECTORS
        .paragraph
        .iter()
        .flat_map(|s| main.select(s))
        .take(ABOUT_PARAGRAPHS)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then(|| truncate_chars(&text, MAX_ABOUT_CHARS))
}

fn faq_from_page(markup: &str) -> Vec<FaqEntry> {
    let document = Html::parse_document(markup);
    faq_entries(document.root_element())
}

fn faq_entries(root: ElementRef<'_>) -> Vec<FaqEntry> {
    let sel = &*SELECTORS;
    let (Some(item), Some(question), Some(answer)) =
        (&sel.faq_item, &sel.faq_question, &sel.faq_answer)
    else {
        return Vec::new();
    };

    root.select(item)
        .filter_map(|entry| {
            let q = entry.select(question).next().map(element_text)?;
            if q.is_empty() {
                return None;
            }
            let a = entry.select(answer).next().map(element_text).unwrap_or_default();
            Some(FaqEntry {
                question: q,
                answer: a,
            })
        })
        .take(MAX_FAQ_ITEMS)
        .collect()
}

fn first_text(document: &Html, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|s| {
        let text = element_text(document.select(s).next()?);
        (!text.is_empty()).then_some(text)
    })
}

fn first_attr(document: &Html, selectors: &[Selector], attr: &str) -> Option<String> {
    selectors.iter().find_map(|s| {
        document.select(s).find_map(|el| {
            let value = el.value().attr(attr)?.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    })
}

fn first_href(document: &Html, selectors: &[Selector]) -> Option<String> {
    first_attr(document, selectors, "href")
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
