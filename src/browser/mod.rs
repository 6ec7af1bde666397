//! Navigation driver for the court portal
//!
//! [`PortalDriver`] is the seam between the orchestration and the browser:
//! - `WebDriverSession`: real Chrome session driven over WebDriver (chromedriver)
//! - in-process fakes in tests, built on the same [`grid::parse_grid_html`] parser

pub mod grid;
pub mod webdriver;

pub use grid::{parse_grid_html, CellLink, GridCell, GridRow};
pub use webdriver::WebDriverSession;

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::Result;

/// Outcome of waiting for a results grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPresence {
    Present,
    /// The grid did not render within the timeout
    Missing,
}

impl GridPresence {
    pub fn is_present(&self) -> bool {
        matches!(self, GridPresence::Present)
    }
}

/// Primitives the portal client needs from a browser session.
#[async_trait]
pub trait PortalDriver: Send + Sync {
    /// Load a URL in the current tab.
    async fn open(&self, url: &str) -> Result<()>;

    /// Clear and type into a text field, then click a submit control.
    async fn fill_and_submit(
        &self,
        field_selector: &str,
        value: &str,
        submit_selector: &str,
    ) -> Result<()>;

    /// Wait until `selector` matches, or report [`GridPresence::Missing`] once
    /// `timeout` elapses. A timeout is not an error.
    async fn wait_for_grid(&self, selector: &str, timeout: Duration) -> Result<GridPresence>;

    /// Data rows under every element matching `selector`, in document order.
    /// Rows without any `td` cell are left out.
    async fn grid_rows(&self, selector: &str) -> Result<Vec<GridRow>>;

    /// Fixed pause letting the page finish repainting.
    async fn settle(&self, delay: Duration) {
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    /// Release the session. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;
}
