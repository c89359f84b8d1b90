//! Static selector catalog keyed by e-commerce platform.
//!
//! Detection scans the raw markup for platform signatures in a fixed order
//! and the first match wins. Every field maps to an ordered list of CSS
//! candidates; earlier entries are the more common markup.

use std::sync::LazyLock;

use regex::Regex;
use storelens_core::Platform;

/// Ordered CSS candidates for each product field.
#[derive(Debug)]
pub struct SelectorSet {
    pub platform: Option<Platform>,
    pub container: &'static [&'static str],
    pub name: &'static [&'static str],
    pub price: &'static [&'static str],
    pub description: &'static [&'static str],
    pub image: &'static [&'static str],
    pub product_link: &'static [&'static str],
}

/// CSS candidates for business context lookups.
#[derive(Debug)]
pub struct BusinessSelectors {
    pub phone: &'static [&'static str],
    pub email: &'static [&'static str],
    pub address: &'static [&'static str],
    pub instagram: &'static [&'static str],
    pub facebook: &'static [&'static str],
    pub twitter: &'static [&'static str],
    pub linkedin: &'static [&'static str],
    pub about: &'static [&'static str],
    pub faq: &'static [&'static str],
    pub shipping: &'static [&'static str],
    pub returns: &'static [&'static str],
    pub terms: &'static [&'static str],
    pub logo_alt: &'static [&'static str],
}

static SIGNATURES: LazyLock<Vec<(Platform, Vec<Regex>)>> = LazyLock::new(|| {
    let compile = |patterns: &[&str]| {
        patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("valid platform signature"))
            .collect::<Vec<_>>()
    };
    vec![
        (
            Platform::Shopify,
            compile(&[r"cdn\.shopify\.com", r"myshopify\.com", r"Shopify\.theme"]),
        ),
        (
            Platform::WooCommerce,
            compile(&[r"woocommerce", r"wp-content/plugins/woocommerce"]),
        ),
        (
            Platform::TiendaNube,
            compile(&[r"tiendanube\.com", r"nube\.com\.ar"]),
        ),
        (Platform::MercadoShops, compile(&[r"mercadoshops\.com"])),
        (Platform::Vtex, compile(&[r"vteximg\.com\.br", r"vtex\.com"])),
    ]
});

/// Detects the storefront platform from raw markup.
#[must_use]
pub fn detect(markup: &str) -> Option<Platform> {
    SIGNATURES.iter().find_map(|(platform, patterns)| {
        patterns
            .iter()
            .any(|re| re.is_match(markup))
            .then_some(*platform)
    })
}

const SHOPIFY: SelectorSet = SelectorSet {
    platform: Some(Platform::Shopify),
    container: &[".product-card", ".product-item", "[data-product-grid-item]"],
    name: &[".product-card__title", ".product__title", "h2.h3"],
    price: &[".price", ".price__regular", ".price-item--regular"],
    description: &[".product-card__description", ".product__description"],
    image: &[".product-card__image img", ".product__media img"],
    product_link: &["a.product-card__link", "a[href*=\"/products/\"]"],
};

const WOOCOMMERCE: SelectorSet = SelectorSet {
    platform: Some(Platform::WooCommerce),
    container: &[".product", "li.product", ".product-item"],
    name: &[".woocommerce-loop-product__title", "h2.product-title", "h3"],
    price: &[".price", ".woocommerce-Price-amount"],
    description: &[
        ".woocommerce-product-details__short-description",
        ".product-short-description",
    ],
    image: &[".wp-post-image", ".product-image img"],
    product_link: &["a.woocommerce-LoopProduct-link", "a[href*=\"/product/\"]"],
};

const TIENDANUBE: SelectorSet = SelectorSet {
    platform: Some(Platform::TiendaNube),
    container: &[".product-item", ".item-product"],
    name: &[".item-name", ".product-name"],
    price: &[".price", ".item-price"],
    description: &[".item-description", ".product-description"],
    image: &[".item-image img", ".product-image img"],
    product_link: &["a.item-link", "a[href*=\"/productos/\"]"],
};

const MERCADOSHOPS: SelectorSet = SelectorSet {
    platform: Some(Platform::MercadoShops),
    container: &[".eshop-item", ".product-card"],
    name: &[".eshop-item__title", ".product-title"],
    price: &[".eshop-price", ".price"],
    description: &[".eshop-item__description"],
    image: &[".eshop-item__image img"],
    product_link: &["a.eshop-item__link"],
};

const VTEX: SelectorSet = SelectorSet {
    platform: Some(Platform::Vtex),
    container: &[".vtex-product-summary", ".product-item"],
    name: &[".vtex-product-summary__product-name", ".productName"],
    price: &[".vtex-product-price", ".sellingPrice"],
    description: &[".vtex-product-summary__description"],
    image: &[".vtex-product-summary__image img"],
    product_link: &["a.vtex-product-summary__container"],
};

const GENERIC: SelectorSet = SelectorSet {
    platform: None,
    container: &[".product", ".product-item", ".item", "[data-product]"],
    name: &["h2", "h3", ".product-title", ".product-name", ".item-name"],
    price: &[".price", ".product-price", ".precio", "[data-price]"],
    description: &[".description", ".product-description", "p"],
    image: &["img"],
    product_link: &[],
};

/// URL fragments that mark product detail pages on any platform. Used after
/// the platform's own link selectors come up empty.
pub(crate) const GENERIC_PRODUCT_LINKS: &[&str] = &[
    "a[href*=\"/products/\"]",
    "a[href*=\"/product/\"]",
    "a[href*=\"/productos/\"]",
    "a[href*=\"/producto/\"]",
    "a[href*=\"/item/\"]",
    "a[href*=\"/p/\"]",
];

const BUSINESS: BusinessSelectors = BusinessSelectors {
    phone: &[
        "a[href^=\"tel:\"]",
        "a[href*=\"whatsapp\"]",
        "a[href*=\"wa.me\"]",
        ".phone",
        ".telefono",
    ],
    email: &["a[href^=\"mailto:\"]", ".email", ".mail"],
    address: &[".address", ".direccion", "[itemtype*=\"PostalAddress\"]"],
    instagram: &["a[href*=\"instagram.com\"]"],
    facebook: &["a[href*=\"facebook.com\"]"],
    twitter: &[
        "a[href*=\"twitter.com\"]",
        "a[href*=\"//x.com/\"]",
        "a[href*=\"www.x.com/\"]",
    ],
    linkedin: &["a[href*=\"linkedin.com\"]"],
    about: &[
        "a[href*=\"nosotros\"]",
        "a[href*=\"about\"]",
        "#about",
        ".about",
    ],
    faq: &[
        "a[href*=\"preguntas\"]",
        "a[href*=\"faq\"]",
        "#faq",
        ".faq",
    ],
    shipping: &[
        "a[href*=\"envio\"]",
        "a[href*=\"shipping\"]",
        "a[href*=\"delivery\"]",
    ],
    returns: &[
        "a[href*=\"devolucion\"]",
        "a[href*=\"cambios\"]",
        "a[href*=\"returns\"]",
        "a[href*=\"refund\"]",
    ],
    terms: &[
        "a[href*=\"terminos\"]",
        "a[href*=\"condiciones\"]",
        "a[href*=\"terms\"]",
    ],
    logo_alt: &["header img[alt]", ".logo img[alt]", ".brand img[alt]"],
};

/// Returns the selector set for a platform, or the permissive generic set.
#[must_use]
pub fn selectors_for(platform: Option<Platform>) -> &'static SelectorSet {
    match platform {
        Some(Platform::Shopify) => &SHOPIFY,
        Some(Platform::WooCommerce) => &WOOCOMMERCE,
        Some(Platform::TiendaNube) => &TIENDANUBE,
        Some(Platform::MercadoShops) => &MERCADOSHOPS,
        Some(Platform::Vtex) => &VTEX,
        None => &GENERIC,
    }
}

#[must_use]
pub fn business_selectors() -> &'static BusinessSelectors {
    &BUSINESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_shopify_by_cdn_host() {
        let html = r#"<link href="//cdn.shopify.com/s/files/theme.css">"#;
        assert_eq!(detect(html), Some(Platform::Shopify));
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(
            detect("<script src='/wp-content/plugins/WooCommerce/x.js'>"),
            Some(Platform::WooCommerce)
        );
    }

    #[test]
    fn first_signature_in_order_wins() {
        // Mentions both Shopify and VTEX; Shopify is scanned first.
        let html = "vteximg.com.br ... cdn.shopify.com";
        assert_eq!(detect(html), Some(Platform::Shopify));
    }

    #[test]
    fn unknown_markup_detects_nothing() {
        assert_eq!(detect("<html><body><h1>Hola</h1></body></html>"), None);
    }

    #[test]
    fn detects_remaining_platforms() {
        assert_eq!(detect("https://x.tiendanube.com"), Some(Platform::TiendaNube));
        assert_eq!(detect("shop.mercadoshops.com.ar"), Some(Platform::MercadoShops));
        assert_eq!(detect("io.vtex.com"), Some(Platform::Vtex));
    }

    #[test]
    fn generic_set_is_returned_without_platform() {
        let set = selectors_for(None);
        assert!(set.platform.is_none());
        assert!(set.container.contains(&".product"));
        assert_eq!(set.image, &["img"]);
    }

    #[test]
    fn platform_sets_match_their_platform() {
        for platform in [
            Platform::Shopify,
            Platform::WooCommerce,
            Platform::TiendaNube,
            Platform::MercadoShops,
            Platform::Vtex,
        ] {
            assert_eq!(selectors_for(Some(platform)).platform, Some(platform));
        }
    }

    #[test]
    fn every_catalog_selector_parses() {
        let sets = [
            None,
            Some(Platform::Shopify),
            Some(Platform::WooCommerce),
            Some(Platform::TiendaNube),
            Some(Platform::MercadoShops),
            Some(Platform::Vtex),
        ];
        for platform in sets {
            let set = selectors_for(platform);
            for css in set
                .container
                .iter()
                .chain(set.name)
                .chain(set.price)
                .chain(set.description)
                .chain(set.image)
                .chain(set.product_link)
                .chain(GENERIC_PRODUCT_LINKS)
            {
                assert!(scraper::Selector::parse(css).is_ok(), "bad selector {css}");
            }
        }
        let b = business_selectors();
        for css in b
            .phone
            .iter()
            .chain(b.email)
            .chain(b.address)
            .chain(b.instagram)
            .chain(b.facebook)
            .chain(b.twitter)
            .chain(b.linkedin)
            .chain(b.about)
            .chain(b.faq)
            .chain(b.shipping)
            .chain(b.returns)
            .chain(b.terms)
            .chain(b.logo_alt)
        {
            assert!(scraper::Selector::parse(css).is_ok(), "bad selector {css}");
        }
    }
}
