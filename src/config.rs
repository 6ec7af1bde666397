//! Scraper configuration

use crate::error::{Result, ScraperError};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Public consultation page of the TJMG first-instance eproc portal
pub const DEFAULT_SEARCH_URL: &str =
    "https://eproc-consulta-publica-1g.tjmg.jus.br/eproc/externo_controlador.php?acao=processo_consulta_publica";

/// Base URL that relative links in the result grids are resolved against
pub const DEFAULT_BASE_URL: &str = "https://eproc-consulta-publica-1g.tjmg.jus.br/eproc/";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/eproc.db";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Selectors the portal pages are expected to keep stable
#[derive(Debug, Clone)]
pub struct PortalSelectors {
    /// Party name text input on the search page
    pub name_field: String,
    /// Submit button on the search page
    pub submit_button: String,
    /// Results grid, shared by the party and case listings
    pub results_grid: String,
}

impl Default for PortalSelectors {
    fn default() -> Self {
        Self {
            name_field: "#txtStrParte".to_string(),
            submit_button: "#sbmNovo".to_string(),
            results_grid: "#divInfraAreaTabela .infraTable".to_string(),
        }
    }
}

/// Browser session settings
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// WebDriver server (chromedriver) endpoint
    pub webdriver_url: String,
    pub headless: bool,
    pub window_size: (u32, u32),
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            window_size: (1920, 1080),
        }
    }
}

/// Scraper configuration
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub search_url: String,
    pub base_url: String,
    pub database_url: String,

    /// Directory snapshot files are written to
    pub data_dir: PathBuf,

    pub selectors: PortalSelectors,
    pub browser: BrowserConfig,

    /// Upper bound for a results grid to appear (default: 20 seconds)
    pub grid_timeout: Duration,

    /// How often the grid presence is re-checked while waiting
    pub grid_poll_interval: Duration,

    /// Pause after a page loads or a grid appears, before reading it (default: 2 seconds)
    pub settle_delay: Duration,

    /// Pause between two parties' collections (default: 1 second)
    pub politeness_delay: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            data_dir: PathBuf::from("data"),
            selectors: PortalSelectors::default(),
            browser: BrowserConfig::default(),
            grid_timeout: Duration::from_secs(20),
            grid_poll_interval: Duration::from_millis(250),
            settle_delay: Duration::from_secs(2),
            politeness_delay: Duration::from_secs(1),
        }
    }
}

impl ScraperConfig {
    /// Create a new config builder
    pub fn builder() -> ScraperConfigBuilder {
        ScraperConfigBuilder::default()
    }

    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(url) = lookup("WEBDRIVER_URL") {
            config.browser.webdriver_url = url;
        }
        if let Some(url) = lookup("EPROC_SEARCH_URL") {
            config.search_url = url;
        }
        if let Some(url) = lookup("EPROC_BASE_URL") {
            config.base_url = url;
        }
        if let Some(dir) = lookup("EPROC_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(headless) = lookup("EPROC_HEADLESS") {
            config.browser.headless = parse_var::<bool>("EPROC_HEADLESS", &headless)?;
        }
        if let Some(secs) = lookup("EPROC_GRID_TIMEOUT_SECS") {
            config.grid_timeout =
                Duration::from_secs(parse_var("EPROC_GRID_TIMEOUT_SECS", &secs)?);
        }
        if let Some(ms) = lookup("EPROC_SETTLE_MS") {
            config.settle_delay = Duration::from_millis(parse_var("EPROC_SETTLE_MS", &ms)?);
        }
        if let Some(ms) = lookup("EPROC_POLITENESS_MS") {
            config.politeness_delay =
                Duration::from_millis(parse_var("EPROC_POLITENESS_MS", &ms)?);
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ScraperError::ConfigError(format!("{} has invalid value '{}'", key, value)))
}

/// Builder for ScraperConfig
#[derive(Default)]
pub struct ScraperConfigBuilder {
    config: ScraperConfig,
}

impl ScraperConfigBuilder {
    pub fn search_url(mut self, url: &str) -> Self {
        self.config.search_url = url.to_string();
        self
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    pub fn database_url(mut self, url: &str) -> Self {
        self.config.database_url = url.to_string();
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    pub fn webdriver_url(mut self, url: &str) -> Self {
        self.config.browser.webdriver_url = url.to_string();
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.browser.headless = headless;
        self
    }

    pub fn grid_timeout(mut self, duration: Duration) -> Self {
        self.config.grid_timeout = duration;
        self
    }

    pub fn grid_poll_interval(mut self, duration: Duration) -> Self {
        self.config.grid_poll_interval = duration;
        self
    }

    pub fn settle_delay(mut self, duration: Duration) -> Self {
        self.config.settle_delay = duration;
        self
    }

    pub fn politeness_delay(mut self, duration: Duration) -> Self {
        self.config.politeness_delay = duration;
        self
    }

    /// Zero every fixed delay; used by tests driving an in-process portal
    pub fn without_delays(mut self) -> Self {
        self.config.settle_delay = Duration::ZERO;
        self.config.politeness_delay = Duration::ZERO;
        self.config.grid_poll_interval = Duration::from_millis(1);
        self
    }

    /// Build the config
    pub fn build(self) -> ScraperConfig {
        self.config
    }
}
