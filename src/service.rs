//! Lookup service: search → collect → persist → export for one query name

use crate::browser::{PortalDriver, WebDriverSession};
use crate::config::ScraperConfig;
use crate::db::{cases, parties, DbPool, NewCase, Party};
use crate::error::Result;
use crate::extract::{CaseListing, PartyListing};
use crate::portal::PortalClient;
use crate::report::{LookupOutcome, LookupReport, PartyResult};
use crate::snapshot::SnapshotExporter;
use tracing::{error, info, warn};

/// Pipeline stage, carried in log records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    Searching,
    Collecting,
    Persisting,
    Exporting,
}

impl LookupStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupStage::Searching => "searching",
            LookupStage::Collecting => "collecting",
            LookupStage::Persisting => "persisting",
            LookupStage::Exporting => "exporting",
        }
    }
}

/// Orchestrates lookups against the portal.
///
/// Built once with the pool and config, then reused for every lookup. Each
/// lookup owns its own browser session and closes it before returning.
pub struct LookupService {
    pool: DbPool,
    config: ScraperConfig,
    exporter: SnapshotExporter,
}

impl LookupService {
    pub fn new(pool: DbPool, config: ScraperConfig) -> Self {
        let exporter = SnapshotExporter::new(config.data_dir.clone());
        Self {
            pool,
            config,
            exporter,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn exporter(&self) -> &SnapshotExporter {
        &self.exporter
    }

    /// Look up `name` using a fresh WebDriver session.
    ///
    /// `name` is used as given; front-ends normalize it first.
    pub async fn lookup(&self, name: &str) -> Result<LookupOutcome> {
        let driver =
            WebDriverSession::connect(&self.config.browser, self.config.grid_poll_interval)
                .await?;
        self.lookup_with(driver, name).await
    }

    /// Look up `name` through `driver`, which is closed on every exit path.
    pub async fn lookup_with<D: PortalDriver>(
        &self,
        mut driver: D,
        name: &str,
    ) -> Result<LookupOutcome> {
        let result = self.run(&driver, name).await;

        if let Err(e) = driver.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        if let Err(e) = &result {
            error!("❌ Lookup for '{}' failed: {}", name, e);
        }
        result
    }

    async fn run<D: PortalDriver + ?Sized>(&self, driver: &D, name: &str) -> Result<LookupOutcome> {
        let portal = PortalClient::new(driver, &self.config)?;

        info!(stage = LookupStage::Searching.as_str(), "Looking up: {}", name);
        let listings = portal.search_parties(name).await?;

        if listings.is_empty() {
            info!("No parties found for '{}'", name);
            return Ok(LookupOutcome::NotFound {
                queried_name: name.to_string(),
            });
        }

        let total = listings.len();
        let mut results = Vec::with_capacity(total);

        for (idx, listing) in listings.into_iter().enumerate() {
            info!(
                stage = LookupStage::Collecting.as_str(),
                "[{}/{}] Processing: {}",
                idx + 1,
                total,
                listing.name
            );
            let cases = portal.collect_cases(listing.detail_link.as_deref()).await;
            driver.settle(self.config.politeness_delay).await;

            self.persist(&listing, &cases).await?;
            results.push(PartyResult {
                party_name: listing.name,
                tax_id: listing.tax_id,
                detail_link: listing.detail_link,
                cases,
            });
        }

        info!(stage = LookupStage::Exporting.as_str(), "Exporting snapshot");
        self.exporter.export(name, &results)?;

        let report = LookupReport::from_results(name, &results);
        info!("📊 Lookup finished:");
        info!("   • {} party(ies) collected", report.total_parties);
        info!("   • {} case(s) collected", report.total_cases);

        Ok(LookupOutcome::Found {
            report,
            parties: results,
        })
    }

    /// Store one party and its cases in a single transaction.
    ///
    /// On error the transaction is dropped, rolling back this party's writes.
    async fn persist(&self, listing: &PartyListing, cases: &[CaseListing]) -> Result<Party> {
        info!(
            stage = LookupStage::Persisting.as_str(),
            "Saving {} case(s) for {}",
            cases.len(),
            listing.name
        );

        let new_cases: Vec<NewCase> = cases.iter().map(NewCase::from).collect();

        let mut tx = self.pool.begin().await?;
        let party = parties::find_or_create_party(&mut tx, &listing.name).await?;
        cases::save_cases(&mut tx, party.id, &new_cases).await?;
        tx.commit().await?;

        Ok(party)
    }
}
