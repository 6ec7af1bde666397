//! Chrome session driven over the WebDriver protocol

use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::{parse_grid_html, GridPresence, GridRow, PortalDriver};
use crate::config::BrowserConfig;
use crate::error::{Result, ScraperError};

/// A live browser session against a chromedriver endpoint
pub struct WebDriverSession {
    driver: Option<WebDriver>,
    poll_interval: Duration,
}

impl WebDriverSession {
    /// Start a new Chrome session
    ///
    /// # Arguments
    /// * `config` - WebDriver endpoint and window options
    /// * `poll_interval` - How often `wait_for_grid` re-checks the page
    pub async fn connect(config: &BrowserConfig, poll_interval: Duration) -> Result<Self> {
        info!("Connecting to WebDriver at {}", config.webdriver_url);

        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.set_headless()?;
        }
        caps.set_disable_gpu()?;
        caps.set_no_sandbox()?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            config.window_size.0, config.window_size.1
        ))?;

        let driver = WebDriver::new(config.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| {
                ScraperError::BrowserOperation(format!(
                    "cannot start session at {}: {}",
                    config.webdriver_url, e
                ))
            })?;

        Ok(Self {
            driver: Some(driver),
            poll_interval,
        })
    }

    fn driver(&self) -> Result<&WebDriver> {
        self.driver.as_ref().ok_or(ScraperError::SessionClosed)
    }
}

#[async_trait]
impl PortalDriver for WebDriverSession {
    async fn open(&self, url: &str) -> Result<()> {
        debug!("Opening {}", url);
        self.driver()?.goto(url).await?;
        Ok(())
    }

    async fn fill_and_submit(
        &self,
        field_selector: &str,
        value: &str,
        submit_selector: &str,
    ) -> Result<()> {
        let driver = self.driver()?;

        let field = driver.find(By::Css(field_selector)).await?;
        field.clear().await?;
        field.send_keys(value).await?;

        let button = driver.find(By::Css(submit_selector)).await?;
        button.click().await?;
        Ok(())
    }

    async fn wait_for_grid(&self, selector: &str, timeout: Duration) -> Result<GridPresence> {
        let driver = self.driver()?;
        let deadline = Instant::now() + timeout;

        loop {
            if !driver.find_all(By::Css(selector)).await?.is_empty() {
                return Ok(GridPresence::Present);
            }
            if Instant::now() >= deadline {
                warn!("Timed out after {:?} waiting for {}", timeout, selector);
                return Ok(GridPresence::Missing);
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn grid_rows(&self, selector: &str) -> Result<Vec<GridRow>> {
        let driver = self.driver()?;
        let mut rows = Vec::new();

        for grid in driver.find_all(By::Css(selector)).await? {
            let html = grid.outer_html().await?;
            rows.extend(parse_grid_html(&html)?);
        }

        debug!("Read {} data row(s) from {}", rows.len(), selector);
        Ok(rows)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(driver) = self.driver.take() {
            driver.quit().await?;
            info!("Browser session closed");
        }
        Ok(())
    }
}
