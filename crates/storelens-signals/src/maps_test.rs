use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use storelens_scraper::{BrowserSession, PageAction, PageNavigator, ScraperError};

use super::*;

const LISTING: &str = r#"<html><body><div role="main">
    <h1>Café Tano</h1>
    <div class="fontDisplayLarge">4,3</div>
    <span role="img" aria-label="4,3 estrellas"></span>
    <button aria-label="1.234 reseñas">1.234 reseñas</button>
    <button data-item-id="address"><div class="fontBodyMedium">Av. Corrientes 1234, CABA</div></button>
    <button data-item-id="phone:tel:01144445555"><div class="fontBodyMedium">011 4444-5555</div></button>
    <div aria-label="Horario: abierto hasta las 20:00"></div>
    <div class="jftiEf">
        <span role="img" aria-label="2 estrellas"></span>
        <span class="wiI7pd">Muy lento y no contestan</span>
    </div>
    <div class="jftiEf">
        <span role="img" aria-label="5 estrellas"></span>
        <span class="wiI7pd">Excelente atención, muy amable</span>
    </div>
    <div class="jftiEf"><span role="img" aria-label="4 estrellas"></span></div>
</div></body></html>"#;

// -----------------------------------------------------------------------
// search_url
// -----------------------------------------------------------------------

#[test]
fn search_url_percent_encodes_name_and_location() {
    assert_eq!(
        search_url("Café Tano", Some("Buenos Aires")),
        "https://www.google.com/maps/search/Caf%C3%A9%20Tano%20Buenos%20Aires"
    );
}

#[test]
fn search_url_ignores_blank_location() {
    assert_eq!(
        search_url(" Tano ", Some("  ")),
        "https://www.google.com/maps/search/Tano"
    );
}

// -----------------------------------------------------------------------
// parse_place
// -----------------------------------------------------------------------

#[test]
fn parses_listing_metrics() {
    let signal = parse_place(LISTING);
    assert_eq!(signal.status, SignalStatus::Found);
    assert_eq!(signal.rating, Some(4.3));
    assert_eq!(signal.total_reviews, 1234);
    assert_eq!(signal.address, "Av. Corrientes 1234, CABA");
    assert_eq!(signal.phone, "011 4444-5555");
    assert_eq!(signal.hours, "Horario: abierto hasta las 20:00");
}

#[test]
fn parses_reviews_and_derives_signals() {
    let signal = parse_place(LISTING);
    assert_eq!(
        signal.reviews,
        vec![
            Review {
                text: "Muy lento y no contestan".to_string(),
                stars: 2,
            },
            Review {
                text: "Excelente atención, muy amable".to_string(),
                stars: 5,
            },
        ]
    );
    assert_eq!(
        signal.pain_signals,
        vec!["Slow service", "Lack of response to customers"]
    );
    assert_eq!(
        signal.praise_signals,
        vec!["Excellent service", "Friendly staff"]
    );
    assert_eq!(signal.snippets.len(), 2);
}

#[test]
fn reviews_are_capped() {
    let items: String = (0..20)
        .map(|i| {
            format!(
                r#"<div data-review-id="r{i}"><span aria-label="5 stars"></span><span class="MyEned">Great {i}</span></div>"#
            )
        })
        .collect();
    let html = format!(r#"<div role="main"><button aria-label="20 reviews"></button>{items}</div>"#);
    let signal = parse_place(&html);
    assert_eq!(signal.total_reviews, 20);
    assert_eq!(signal.reviews.len(), 15);
    assert_eq!(signal.reviews[14].text, "Great 14");
}

#[test]
fn zero_review_count_skips_review_parsing() {
    let html = r#"<div role="main"><span aria-label="4,8 estrellas"></span>
        <div class="jftiEf"><span class="wiI7pd">texto</span></div></div>"#;
    let signal = parse_place(html);
    assert_eq!(signal.status, SignalStatus::Found);
    assert_eq!(signal.rating, Some(4.8));
    assert_eq!(signal.total_reviews, 0);
    assert!(signal.reviews.is_empty());
}

#[test]
fn page_without_place_is_not_found() {
    let signal = parse_place("<html><body><p>No encontramos resultados</p></body></html>");
    assert_eq!(signal.status, SignalStatus::NotFound);
    assert!(signal.rating.is_none());
}

// -----------------------------------------------------------------------
// collector
// -----------------------------------------------------------------------

/// Serves `pages` in call order and records every call's URL and actions.
/// A `None` page fails that navigation.
#[derive(Clone, Default)]
struct StubLauncher {
    pages: Vec<Option<String>>,
    calls: Arc<Mutex<Vec<(String, Vec<PageAction>)>>>,
    closed: Arc<Mutex<usize>>,
}

impl StubLauncher {
    fn serving(pages: &[Option<&str>]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.map(str::to_string)).collect(),
            ..Self::default()
        }
    }

    fn visited(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }

    fn actions(&self) -> Vec<Vec<PageAction>> {
        self.calls.lock().unwrap().iter().map(|(_, a)| a.clone()).collect()
    }
}

struct StubSession {
    pages: Vec<Option<String>>,
    calls: Arc<Mutex<Vec<(String, Vec<PageAction>)>>>,
    closed: Arc<Mutex<usize>>,
}

#[async_trait]
impl BrowserLauncher for StubLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScraperError> {
        Ok(Box::new(StubSession {
            pages: self.pages.clone(),
            calls: Arc::clone(&self.calls),
            closed: Arc::clone(&self.closed),
        }))
    }
}

#[async_trait]
impl PageNavigator for StubSession {
    async fn load(&self, url: &str) -> Result<String, ScraperError> {
        self.load_with(url, &[]).await
    }
}

#[async_trait]
impl BrowserSession for StubSession {
    async fn load_with(&self, url: &str, actions: &[PageAction]) -> Result<String, ScraperError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push((url.to_string(), actions.to_vec()));
        self.pages
            .get(index)
            .cloned()
            .flatten()
            .ok_or_else(|| ScraperError::Browser("tab crashed".to_string()))
    }

    async fn close(self: Box<Self>) {
        *self.closed.lock().unwrap() += 1;
    }
}

fn identity(name: &str) -> BusinessIdentity {
    BusinessIdentity {
        name: name.to_string(),
        url: "https://www.cafetano.com.ar/".to_string(),
        location: Some("Palermo".to_string()),
        ..BusinessIdentity::default()
    }
}

const OVERVIEW: &str = r#"<html><body><div role="main">
    <span role="img" aria-label="4,3 estrellas"></span>
    <button aria-label="87 reseñas">87 reseñas</button>
    <button data-item-id="address"><div class="fontBodyMedium">Av. Corrientes 1234, CABA</div></button>
</div></body></html>"#;

const REVIEWS_PANEL: &str = r#"<html><body><div role="feed">
    <div class="jftiEf">
        <span role="img" aria-label="1 estrellas"></span>
        <span class="wiI7pd">Tardaron una hora, muy lento</span>
    </div>
    <div class="jftiEf">
        <span role="img" aria-label="5 estrellas"></span>
        <span class="wiI7pd">Excelente atención</span>
    </div>
</div></body></html>"#;

#[test]
fn review_actions_open_panel_and_scroll_feed() {
    let actions = review_actions();
    assert_eq!(actions[0], overview_actions()[0]);
    assert!(matches!(
        &actions[1],
        PageAction::Click { selector, .. } if selector.contains("reseñas")
    ));
    assert!(matches!(
        &actions[2],
        PageAction::Scroll { selector, times: 3, .. } if selector.contains("feed")
    ));
}

#[tokio::test]
async fn collector_searches_by_name_and_location() {
    let launcher = StubLauncher::serving(&[Some(LISTING), Some(LISTING)]);
    let collector = MapsReputationCollector::new(launcher.clone());

    let signal = collector.collect(&identity("Café Tano")).await;

    assert_eq!(signal.status, SignalStatus::Found);
    let url = search_url("Café Tano", Some("Palermo"));
    assert_eq!(launcher.visited(), vec![url.clone(), url]);
    assert_eq!(*launcher.closed.lock().unwrap(), 1);
}

#[tokio::test]
async fn reviews_come_from_the_opened_panel() {
    let launcher = StubLauncher::serving(&[Some(OVERVIEW), Some(REVIEWS_PANEL)]);
    let collector = MapsReputationCollector::new(launcher.clone());

    let signal = collector.collect(&identity("Café Tano")).await;

    assert_eq!(launcher.actions(), vec![overview_actions(), review_actions()]);
    assert_eq!(signal.rating, Some(4.3));
    assert_eq!(signal.total_reviews, 87);
    assert_eq!(signal.address, "Av. Corrientes 1234, CABA");
    assert_eq!(signal.reviews.len(), 2);
    assert_eq!(signal.reviews[0].stars, 1);
    assert!(signal.pain_signals.contains(&"Slow service".to_string()));
    assert!(signal.praise_signals.contains(&"Excellent service".to_string()));
    assert_eq!(signal.snippets.len(), 2);
}

#[tokio::test]
async fn listing_without_reviews_skips_the_panel() {
    let page = r#"<div role="main"><span aria-label="4,8 estrellas"></span></div>"#;
    let launcher = StubLauncher::serving(&[Some(page)]);
    let collector = MapsReputationCollector::new(launcher.clone());

    let signal = collector.collect(&identity("Café Tano")).await;

    assert_eq!(signal.status, SignalStatus::Found);
    assert_eq!(launcher.actions(), vec![overview_actions()]);
}

#[tokio::test]
async fn failed_review_pass_keeps_the_overview() {
    let launcher = StubLauncher::serving(&[Some(OVERVIEW), None]);
    let collector = MapsReputationCollector::new(launcher.clone());

    let signal = collector.collect(&identity("Café Tano")).await;

    assert_eq!(signal.status, SignalStatus::Found);
    assert_eq!(signal.rating, Some(4.3));
    assert!(signal.reviews.is_empty());
    assert_eq!(*launcher.closed.lock().unwrap(), 1);
}

#[tokio::test]
async fn collector_falls_back_to_site_host_without_a_name() {
    let launcher = StubLauncher::serving(&[Some(LISTING), Some(LISTING)]);
    let collector = MapsReputationCollector::new(launcher.clone());

    collector
        .collect(&identity(storelens_core::NAME_NOT_FOUND))
        .await;

    assert_eq!(
        launcher.visited()[0],
        search_url("cafetano.com.ar", Some("Palermo"))
    );
}

#[tokio::test]
async fn failed_navigation_becomes_error_signal_and_closes_browser() {
    let launcher = StubLauncher::default();
    let collector = MapsReputationCollector::new(launcher.clone());

    let signal = collector.collect(&identity("Café Tano")).await;

    assert_eq!(signal.status, SignalStatus::Error);
    assert!(signal.error.as_deref().unwrap_or_default().contains("tab crashed"));
    assert_eq!(*launcher.closed.lock().unwrap(), 1);
}

#[tokio::test]
async fn identity_without_name_or_host_is_an_error() {
    let collector = MapsReputationCollector::new(StubLauncher::default());
    let signal = collector
        .collect(&BusinessIdentity {
            url: "not a url".to_string(),
            ..BusinessIdentity::default()
        })
        .await;
    assert_eq!(signal.status, SignalStatus::Error);
}
