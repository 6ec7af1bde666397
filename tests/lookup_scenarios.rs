/// End-to-end lookup scenarios against an in-process portal
///
/// The fake portal serves grid HTML through the same parser the WebDriver
/// session uses, and every test runs on its own in-memory SQLite store and
/// temporary data directory.
use async_trait::async_trait;
use eproc_scraper::browser::{parse_grid_html, GridPresence, GridRow, PortalDriver};
use eproc_scraper::db::{cases, create_memory_pool, parties, DbPool};
use eproc_scraper::{LookupOutcome, LookupService, PartyResult, Result, ScraperConfig, ScraperError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const SEARCH_URL: &str = "https://portal.test/eproc/externo_controlador.php?acao=processo_consulta_publica";
const BASE_URL: &str = "https://portal.test/eproc/";

/// What the portal renders at a URL
#[derive(Clone)]
enum Page {
    Grid(String),
    /// The grid never appears
    Timeout,
    /// Navigation itself fails
    Broken,
}

#[derive(Default)]
struct FakePortal {
    /// Search results grid keyed by submitted name
    searches: HashMap<String, String>,
    pages: HashMap<String, Page>,
    fail_search_page: bool,
    current: Mutex<Option<Page>>,
    closed: Arc<AtomicBool>,
}

impl FakePortal {
    fn new() -> Self {
        Self::default()
    }

    fn with_search(mut self, name: &str, html: String) -> Self {
        self.searches.insert(name.to_string(), html);
        self
    }

    fn with_page(mut self, url: &str, page: Page) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

#[async_trait]
impl PortalDriver for FakePortal {
    async fn open(&self, url: &str) -> Result<()> {
        if url == SEARCH_URL {
            if self.fail_search_page {
                return Err(ScraperError::BrowserOperation("search page unreachable".into()));
            }
            *self.current.lock().unwrap() = None;
            return Ok(());
        }

        let page = self.pages.get(url).cloned().unwrap_or(Page::Timeout);
        if let Page::Broken = page {
            return Err(ScraperError::BrowserOperation(format!("net::ERR_FAILED {}", url)));
        }
        *self.current.lock().unwrap() = Some(page);
        Ok(())
    }

    async fn fill_and_submit(&self, field: &str, value: &str, submit: &str) -> Result<()> {
        assert_eq!(field, "#txtStrParte");
        assert_eq!(submit, "#sbmNovo");
        let page = match self.searches.get(value) {
            Some(html) => Page::Grid(html.clone()),
            None => Page::Timeout,
        };
        *self.current.lock().unwrap() = Some(page);
        Ok(())
    }

    async fn wait_for_grid(&self, _selector: &str, _timeout: Duration) -> Result<GridPresence> {
        match &*self.current.lock().unwrap() {
            Some(Page::Grid(_)) => Ok(GridPresence::Present),
            _ => Ok(GridPresence::Missing),
        }
    }

    async fn grid_rows(&self, _selector: &str) -> Result<Vec<GridRow>> {
        let html = match &*self.current.lock().unwrap() {
            Some(Page::Grid(html)) => html.clone(),
            _ => String::new(),
        };
        parse_grid_html(&html)
    }

    async fn close(&mut self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn party_grid(parties: &[(&str, &str, Option<&str>)]) -> String {
    let rows: String = parties
        .iter()
        .map(|(name, tax_id, href)| {
            let first = match href {
                Some(href) => format!(r#"<a href="{}">{}</a>"#, href, name),
                None => name.to_string(),
            };
            format!("<tr><td>{}</td><td>{}</td></tr>", first, tax_id)
        })
        .collect();
    format!(
        r#"<table class="infraTable"><tr><th>Nome</th><th>CPF/CNPJ</th></tr>{}</table>"#,
        rows
    )
}

fn case_grid(numbers: &[&str]) -> String {
    let rows: String = numbers
        .iter()
        .map(|n| {
            format!(
                r#"<tr><td><a href="externo_controlador.php?acao=processo_selecionar&amp;num={n}">{n}</a></td>
                   <td>JOSÉ SILVA</td><td>BANCO DO BRASIL S.A.</td>
                   <td>Contratos Bancários</td><td>Juntada de Petição</td></tr>"#
            )
        })
        .collect();
    format!(
        r#"<table class="infraTable">
             <tr><th>Processo</th><th>Autor</th><th>Réu</th><th>Assunto</th><th>Último Evento</th></tr>
             {}
             <tr><td colspan="5">{} registro(s)</td></tr>
           </table>"#,
        rows,
        numbers.len()
    )
}

fn party_url(id: u32) -> String {
    format!("{}externo_controlador.php?acao=consulta_parte&id={}", BASE_URL, id)
}

fn party_href(id: u32) -> String {
    format!("externo_controlador.php?acao=consulta_parte&amp;id={}", id)
}

async fn service() -> (LookupService, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let pool = create_memory_pool().await.unwrap();
    let config = ScraperConfig::builder()
        .search_url(SEARCH_URL)
        .base_url(BASE_URL)
        .data_dir(dir.path().join("data"))
        .without_delays()
        .build();
    (LookupService::new(pool, config), dir)
}

async fn case_count(pool: &DbPool, name: &str) -> i64 {
    let party = parties::get_party_by_name(pool, name).await.unwrap().unwrap();
    cases::count_cases_for_party(pool, party.id).await.unwrap()
}

fn jose_silva_portal() -> FakePortal {
    let href = party_href(1);
    FakePortal::new()
        .with_search(
            "JOSÉ SILVA",
            party_grid(&[("JOSÉ SILVA", "123.456.789-00", Some(&href))]),
        )
        .with_page(&party_url(1), Page::Grid(case_grid(&["0001", "0002"])))
}

#[tokio::test]
async fn unmatched_name_is_not_found() {
    let (service, _dir) = service().await;
    let portal = FakePortal::new();
    let closed = portal.closed_flag();

    let outcome = service.lookup_with(portal, "MARIA SANTOS").await.unwrap();

    assert!(matches!(
        outcome,
        LookupOutcome::NotFound { ref queried_name } if queried_name == "MARIA SANTOS"
    ));
    assert!(!service.exporter().path_for("MARIA SANTOS").exists());
    assert_eq!(parties::count_parties(service.pool()).await.unwrap(), 0);
    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn single_party_with_two_cases_is_stored_and_exported() {
    let (service, _dir) = service().await;
    let portal = jose_silva_portal();
    let closed = portal.closed_flag();

    let outcome = service.lookup_with(portal, "JOSÉ SILVA").await.unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.queried_name, "JOSÉ SILVA");
    assert_eq!(report.total_parties, 1);
    assert_eq!(report.total_cases, 2);
    assert_eq!(report.cases[0].party, "JOSÉ SILVA");
    assert_eq!(report.cases[0].tax_id, "123.456.789-00");
    assert_eq!(
        report.cases[1].case.detail_link.as_deref(),
        Some("https://portal.test/eproc/externo_controlador.php?acao=processo_selecionar&num=0002")
    );

    let pool = service.pool();
    assert_eq!(parties::count_parties(pool).await.unwrap(), 1);
    assert_eq!(case_count(pool, "JOSÉ SILVA").await, 2);

    let path = service.exporter().path_for("JOSÉ SILVA");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("JOSÉ SILVA"));
    let snapshot: Vec<PartyResult> = serde_json::from_str(&text).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].cases.len(), 2);
    assert_eq!(snapshot[0].detail_link.as_deref(), Some(party_url(1).as_str()));

    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn case_grid_timeout_only_empties_that_party() {
    let (service, _dir) = service().await;
    let (first, second) = (party_href(1), party_href(2));
    let portal = FakePortal::new()
        .with_search(
            "JOSÉ SILVA",
            party_grid(&[
                ("JOSÉ SILVA", "123.456.789-00", Some(&first)),
                ("JOSÉ SILVA FILHO", "987.654.321-00", Some(&second)),
            ]),
        )
        .with_page(&party_url(1), Page::Grid(case_grid(&["0001", "0002"])))
        .with_page(&party_url(2), Page::Timeout);

    let outcome = service.lookup_with(portal, "JOSÉ SILVA").await.unwrap();

    let LookupOutcome::Found { report, parties: results } = outcome else {
        panic!("expected a found outcome");
    };
    assert_eq!(report.total_parties, 2);
    assert_eq!(report.total_cases, 2);
    assert_eq!(results[0].party_name, "JOSÉ SILVA");
    assert_eq!(results[0].cases.len(), 2);
    assert_eq!(results[1].party_name, "JOSÉ SILVA FILHO");
    assert!(results[1].cases.is_empty());

    let pool = service.pool();
    assert_eq!(case_count(pool, "JOSÉ SILVA").await, 2);
    assert_eq!(case_count(pool, "JOSÉ SILVA FILHO").await, 0);
}

#[tokio::test]
async fn failing_party_page_does_not_sink_the_batch() {
    let (service, _dir) = service().await;
    let (first, second) = (party_href(1), party_href(2));
    let portal = FakePortal::new()
        .with_search(
            "ANA",
            party_grid(&[
                ("ANA COSTA", "1", Some(&first)),
                ("ANA LIMA", "2", Some(&second)),
            ]),
        )
        .with_page(&party_url(1), Page::Broken)
        .with_page(&party_url(2), Page::Grid(case_grid(&["0009"])));

    let outcome = service.lookup_with(portal, "ANA").await.unwrap();

    let report = outcome.report().unwrap();
    assert_eq!(report.total_parties, 2);
    assert_eq!(report.total_cases, 1);
    assert_eq!(report.cases[0].party, "ANA LIMA");
}

#[tokio::test]
async fn party_without_link_has_no_cases() {
    let (service, _dir) = service().await;
    let portal = FakePortal::new().with_search(
        "PEDRO ALVES",
        party_grid(&[("PEDRO ALVES", "", None)]),
    );

    let outcome = service.lookup_with(portal, "PEDRO ALVES").await.unwrap();

    let LookupOutcome::Found { parties: results, .. } = outcome else {
        panic!("expected a found outcome");
    };
    assert_eq!(results.len(), 1);
    assert!(results[0].detail_link.is_none());
    assert!(results[0].cases.is_empty());
    assert_eq!(case_count(service.pool(), "PEDRO ALVES").await, 0);
}

#[tokio::test]
async fn repeated_lookup_appends_duplicate_cases() {
    let (service, _dir) = service().await;

    service.lookup_with(jose_silva_portal(), "JOSÉ SILVA").await.unwrap();
    let outcome = service.lookup_with(jose_silva_portal(), "JOSÉ SILVA").await.unwrap();

    assert_eq!(outcome.report().unwrap().total_cases, 2);

    let pool = service.pool();
    assert_eq!(parties::count_parties(pool).await.unwrap(), 1);
    assert_eq!(case_count(pool, "JOSÉ SILVA").await, 4);

    let party = parties::get_party_by_name(pool, "JOSÉ SILVA").await.unwrap().unwrap();
    let stored = cases::list_cases_for_party(pool, party.id).await.unwrap();
    let numbers: Vec<&str> = stored.iter().map(|c| c.case_number.as_str()).collect();
    assert_eq!(numbers, vec!["0001", "0002", "0001", "0002"]);
}

#[tokio::test]
async fn search_failure_aborts_and_releases_browser() {
    let (service, _dir) = service().await;
    let mut portal = jose_silva_portal();
    portal.fail_search_page = true;
    let closed = portal.closed_flag();

    let err = service.lookup_with(portal, "JOSÉ SILVA").await.unwrap_err();

    assert!(matches!(err, ScraperError::BrowserOperation(_)));
    assert!(closed.load(Ordering::SeqCst));
    assert_eq!(parties::count_parties(service.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn store_failure_aborts_without_snapshot() {
    let (service, _dir) = service().await;
    let portal = jose_silva_portal();
    let closed = portal.closed_flag();

    service.pool().close().await;
    let err = service.lookup_with(portal, "JOSÉ SILVA").await.unwrap_err();

    assert!(matches!(err, ScraperError::DatabaseError(_)));
    assert!(closed.load(Ordering::SeqCst));
    assert!(!service.exporter().path_for("JOSÉ SILVA").exists());
}
