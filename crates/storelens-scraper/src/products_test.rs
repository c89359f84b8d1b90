use super::*;
use crate::catalog::selectors_for;
use storelens_core::Platform;

const BASE: &str = "https://tienda.example.com/catalogo";

fn generic() -> &'static SelectorSet {
    selectors_for(None)
}

fn listing(cards: &str) -> String {
    format!("<html><body><main>{cards}</main></body></html>")
}

// -----------------------------------------------------------------------
// container + name
// -----------------------------------------------------------------------

#[test]
fn extracts_one_record_per_container() {
    let cards: String = (1..=5)
        .map(|i| format!(r#"<div class="product"><h3>Mate {i}</h3><span class="price">$ {i}00</span></div>"#))
        .collect();
    let out = ProductExtractor::default().extract(&listing(&cards), BASE, generic());
    assert_eq!(out.container_count, 5);
    assert_eq!(out.products.len(), 5);
    assert_eq!(out.products[0].name, "Mate 1");
    assert_eq!(out.products[4].price, "$ 500");
    assert!(out.product_links.is_empty());
}

#[test]
fn records_without_a_name_are_discarded() {
    let cards = r#"
        <div class="product"><h3>Yerba</h3></div>
        <div class="product"><span class="price">$ 10</span></div>
    "#;
    let out = ProductExtractor::default().extract(&listing(cards), BASE, generic());
    assert_eq!(out.container_count, 2);
    assert_eq!(out.products.len(), 1);
    assert!(out.products.iter().all(|p| !p.name.is_empty()));
}

#[test]
fn name_falls_back_to_first_heading() {
    let cards = r#"<li class="product"><h4>Bombilla</h4></li>"#;
    let out = ProductExtractor::default().extract(
        &listing(cards),
        BASE,
        selectors_for(Some(Platform::WooCommerce)),
    );
    assert_eq!(out.products[0].name, "Bombilla");
}

#[test]
fn first_container_selector_with_matches_wins() {
    // `.product` is tried before `.item`; the `.item` block is ignored.
    let cards = r#"
        <div class="product"><h3>A</h3></div>
        <div class="item"><h3>B</h3></div>
    "#;
    let out = ProductExtractor::default().extract(&listing(cards), BASE, generic());
    assert_eq!(out.container_count, 1);
    assert_eq!(out.products[0].name, "A");
}

// -----------------------------------------------------------------------
// price + description
// -----------------------------------------------------------------------

#[test]
fn price_whitespace_is_normalized() {
    let cards = r#"<div class="product"><h3>Termo</h3><span class="price">
        $   12.500 </span></div>"#;
    let out = ProductExtractor::default().extract(&listing(cards), BASE, generic());
    assert_eq!(out.products[0].price, "$ 12.500");
}

#[test]
fn price_falls_back_to_currency_scan() {
    let cards = r#"<div class="product"><h3>Termo</h3><em>Oferta 45,90 €</em></div>"#;
    let out = ProductExtractor::default().extract(&listing(cards), BASE, generic());
    assert_eq!(out.products[0].price, "45,90 €");
}

#[test]
fn short_css_description_falls_back_to_paragraphs() {
    let cards = r#"<li class="product"><h3>Mate</h3>
        <div class="product-short-description">Nuevo</div>
        <p>Calabaza curada a mano.</p><p>Incluye bombilla.</p><p>Tercero.</p>
    </li>"#;
    let out = ProductExtractor::default().extract(
        &listing(cards),
        BASE,
        selectors_for(Some(Platform::WooCommerce)),
    );
    assert_eq!(
        out.products[0].description,
        "Calabaza curada a mano. Incluye bombilla."
    );
}

#[test]
fn description_is_truncated() {
    let long = "x".repeat(800);
    let cards = format!(r#"<div class="product"><h3>Mate</h3><div class="description">{long}</div></div>"#);
    let out = ProductExtractor::default().extract(&listing(&cards), BASE, generic());
    assert_eq!(out.products[0].description.chars().count(), MAX_DESCRIPTION_CHARS);
}

// -----------------------------------------------------------------------
// images
// -----------------------------------------------------------------------

#[test]
fn images_are_resolved_filtered_deduped_and_capped() {
    let cards = r#"<div class="product"><h3>Mate</h3>
        <img src="/img/placeholder.png">
        <img src="//cdn.example.com/a.jpg">
        <img src="//cdn.example.com/a.jpg">
        <img data-src="/files/b.jpg">
        <img src="img/c.jpg">
        <img src="https://other.example.com/d.jpg">
    </div>"#;
    let out = ProductExtractor::default().extract(&listing(cards), BASE, generic());
    assert_eq!(
        out.products[0].image_urls,
        vec![
            "https://cdn.example.com/a.jpg".to_string(),
            "https://tienda.example.com/files/b.jpg".to_string(),
            "https://tienda.example.com/img/c.jpg".to_string(),
        ]
    );
}

#[test]
fn lazy_attribute_wins_over_inline_data_uri() {
    let cards = r#"<div class="product"><h3>Mate</h3>
        <img src="data:image/gif;base64,R0lGOD" data-lazy-src="https://cdn.example.com/real.jpg">
    </div>"#;
    let out = ProductExtractor::default().extract(&listing(cards), BASE, generic());
    assert_eq!(out.products[0].image_urls, vec!["https://cdn.example.com/real.jpg"]);
}

#[test]
fn spinner_and_loading_images_are_rejected() {
    let cards = r#"<div class="product"><h3>Mate</h3>
        <img src="/assets/Spinner.gif"><img src="/assets/loading.svg">
    </div>"#;
    let out = ProductExtractor::default().extract(&listing(cards), BASE, generic());
    assert!(out.products[0].image_urls.is_empty());
}

// -----------------------------------------------------------------------
// link fan-out
// -----------------------------------------------------------------------

#[test]
fn zero_containers_yields_same_site_product_links() {
    let html = r##"<html><body>
        <a href="/productos/mate-imperial">Mate</a>
        <a href="/productos/mate-imperial#reviews">Mate again</a>
        <a href="https://tienda.example.com/producto/termo">Termo</a>
        <a href="https://otra-tienda.com/productos/x">Elsewhere</a>
        <a href="/contacto">Contacto</a>
    </body></html>"##;
    let out = ProductExtractor::default().extract(html, BASE, generic());
    assert!(out.products.is_empty());
    assert_eq!(out.container_count, 0);
    assert_eq!(
        out.product_links,
        vec![
            "https://tienda.example.com/productos/mate-imperial".to_string(),
            "https://tienda.example.com/producto/termo".to_string(),
        ]
    );
}

#[test]
fn product_links_are_capped() {
    let anchors: String = (0..25)
        .map(|i| format!(r#"<a href="/products/item-{i}">p</a>"#))
        .collect();
    let html = format!("<html><body>{anchors}</body></html>");
    let out = ProductExtractor::new(4).extract(&html, BASE, generic());
    assert_eq!(out.product_links.len(), 4);
    assert!(out.product_links[0].ends_with("/products/item-0"));
}

#[test]
fn www_prefix_counts_as_same_site() {
    let html = r#"<a href="https://www.tienda.example.com/p/42">x</a>"#;
    let out = ProductExtractor::default().extract(html, BASE, generic());
    assert_eq!(out.product_links.len(), 1);
}

// -----------------------------------------------------------------------
// detail pages
// -----------------------------------------------------------------------

#[test]
fn detail_page_without_container_uses_main() {
    let html = r#"<html><body><nav><h2>Menu</h2></nav><main>
        <h1>Mate Imperial</h1>
        <span class="price">$ 30.000</span>
        <p>Mate de calabaza con virola de alpaca.</p>
        <img src="/files/mate.jpg">
    </main></body></html>"#;
    let products = ProductExtractor::default().extract_detail(
        html,
        "https://tienda.example.com/productos/mate",
        generic(),
    );
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Mate Imperial");
    assert_eq!(products[0].price, "$ 30.000");
    assert_eq!(products[0].image_urls, vec!["https://tienda.example.com/files/mate.jpg"]);
}

#[test]
fn detail_page_without_name_yields_nothing() {
    let html = "<html><body><p>Sin nombre</p></body></html>";
    let products = ProductExtractor::default().extract_detail(html, BASE, generic());
    assert!(products.is_empty());
}
