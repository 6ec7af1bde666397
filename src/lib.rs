//! eproc-scraper - looks up parties on the TJMG eproc public portal
//!
//! For one party name this crate searches the portal, follows every matched
//! party to its case listing, stores parties and cases in SQLite and writes a
//! JSON snapshot of the collected results.
//!
//! The pipeline:
//! 1. Search the portal and extract the party grid
//! 2. For each party, open its case listing and extract the case grid
//! 3. Store the party (find-or-create) and its cases in one transaction
//! 4. Export the per-party results to `<data_dir>/results_<NAME>.json`

pub mod browser;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod portal;
pub mod report;
pub mod service;
pub mod snapshot;

pub use browser::{GridPresence, PortalDriver, WebDriverSession};
pub use config::ScraperConfig;
pub use error::{Result, ScraperError};
pub use extract::{extract_cases, extract_parties, CaseListing, PartyListing, RowKind};
pub use report::{CaseWithParty, LookupOutcome, LookupReport, PartyResult};
pub use service::LookupService;
pub use snapshot::SnapshotExporter;

/// Normalize a party name the way the portal is queried: trimmed, upper case
///
/// # Example
/// ```
/// assert_eq!(eproc_scraper::normalize_query_name("  josé silva "), "JOSÉ SILVA");
/// ```
pub fn normalize_query_name(name: &str) -> String {
    name.trim().to_uppercase()
}
