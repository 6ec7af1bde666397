//! Portal client: the search and case-collection flows on top of a driver

use crate::browser::{GridRow, PortalDriver};
use crate::config::ScraperConfig;
use crate::error::{Result, ScraperError};
use crate::extract::{extract_cases, extract_parties, CaseListing, PartyListing};
use tracing::{info, warn};
use url::Url;

/// Runs the portal flows through a borrowed driver
pub struct PortalClient<'a, D: PortalDriver + ?Sized> {
    driver: &'a D,
    config: &'a ScraperConfig,
    base_url: Url,
}

impl<'a, D: PortalDriver + ?Sized> PortalClient<'a, D> {
    pub fn new(driver: &'a D, config: &'a ScraperConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| ScraperError::InvalidUrl(config.base_url.clone()))?;

        Ok(Self {
            driver,
            config,
            base_url,
        })
    }

    /// Search the portal for parties matching `name`.
    ///
    /// A results grid that never shows up means no parties, not an error.
    pub async fn search_parties(&self, name: &str) -> Result<Vec<PartyListing>> {
        info!("🔍 Searching portal for: {}", name);

        let selectors = &self.config.selectors;
        self.driver.open(&self.config.search_url).await?;
        self.driver.settle(self.config.settle_delay).await;
        self.driver
            .fill_and_submit(&selectors.name_field, name, &selectors.submit_button)
            .await?;

        let Some(rows) = self.read_grid().await? else {
            warn!("Timed out waiting for search results for '{}'", name);
            return Ok(Vec::new());
        };

        let parties = extract_parties(&rows, &self.base_url);
        info!("✓ {} party(ies) found", parties.len());
        Ok(parties)
    }

    /// Collect the cases listed behind a party link.
    ///
    /// Errors are contained here: a failing or missing page yields no cases.
    pub async fn collect_cases(&self, detail_link: Option<&str>) -> Vec<CaseListing> {
        let Some(link) = detail_link else {
            return Vec::new();
        };

        match self.try_collect_cases(link).await {
            Ok(cases) => {
                info!("  ✓ Collected {} case(s)", cases.len());
                cases
            }
            Err(e) => {
                warn!("  Failed to collect cases from {}: {}", link, e);
                Vec::new()
            }
        }
    }

    async fn try_collect_cases(&self, link: &str) -> Result<Vec<CaseListing>> {
        self.driver.open(link).await?;

        match self.read_grid().await? {
            Some(rows) => Ok(extract_cases(&rows, &self.base_url)),
            None => {
                warn!("  Timed out waiting for the case grid at {}", link);
                Ok(Vec::new())
            }
        }
    }

    /// Wait for the results grid, let it settle, then read its rows
    async fn read_grid(&self) -> Result<Option<Vec<GridRow>>> {
        let grid = &self.config.selectors.results_grid;

        let presence = self
            .driver
            .wait_for_grid(grid, self.config.grid_timeout)
            .await?;
        if !presence.is_present() {
            return Ok(None);
        }

        self.driver.settle(self.config.settle_delay).await;
        Ok(Some(self.driver.grid_rows(grid).await?))
    }
}
