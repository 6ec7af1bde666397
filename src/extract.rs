//! Result extractors for the party and case grids
//!
//! Both extractors are pure: they only look at the rows handed in, keep the
//! input order and never sort or deduplicate.

use crate::browser::{GridCell, GridRow};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Fewest cells a party row can have (name)
pub const MIN_PARTY_CELLS: usize = 1;

/// Fewest cells a case row can have (number, plaintiff, defendant, subject, last event)
pub const MIN_CASE_CELLS: usize = 5;

/// Row shape, decided by cell count alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Enough cells for a case listing (and therefore for a party listing)
    Case,
    /// Enough cells for a party listing only
    Party,
    Unrecognized,
}

impl RowKind {
    pub fn classify(row: &GridRow) -> Self {
        match row.len() {
            n if n >= MIN_CASE_CELLS => RowKind::Case,
            n if n >= MIN_PARTY_CELLS => RowKind::Party,
            _ => RowKind::Unrecognized,
        }
    }
}

/// A party as listed in the search results grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyListing {
    pub name: String,
    /// CPF/CNPJ column; empty when the grid has no second column
    pub tax_id: String,
    pub detail_link: Option<String>,
}

/// A case as listed in a party's case grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseListing {
    pub case_number: String,
    pub plaintiff: String,
    pub defendant: String,
    pub subject: String,
    pub last_event: String,
    pub detail_link: Option<String>,
}

/// Extract party listings from the search results grid
pub fn extract_parties(rows: &[GridRow], base_url: &Url) -> Vec<PartyListing> {
    let parties: Vec<PartyListing> = rows
        .iter()
        .filter(|row| matches!(RowKind::classify(row), RowKind::Party | RowKind::Case))
        .filter_map(|row| {
            let (name, detail_link) = text_and_link(row.cell(0)?, base_url);
            let tax_id = row.cell(1).map(|c| c.text.clone()).unwrap_or_default();
            Some(PartyListing {
                name,
                tax_id,
                detail_link,
            })
        })
        .collect();

    debug!("Extracted {} party row(s) from {} row(s)", parties.len(), rows.len());
    parties
}

/// Extract case listings from a party's case grid
///
/// Rows with fewer than [`MIN_CASE_CELLS`] cells (summaries, footers) are dropped.
pub fn extract_cases(rows: &[GridRow], base_url: &Url) -> Vec<CaseListing> {
    let cases: Vec<CaseListing> = rows
        .iter()
        .filter(|row| RowKind::classify(row) == RowKind::Case)
        .map(|row| {
            let (case_number, detail_link) = text_and_link(&row.cells[0], base_url);
            CaseListing {
                case_number,
                plaintiff: row.cells[1].text.clone(),
                defendant: row.cells[2].text.clone(),
                subject: row.cells[3].text.clone(),
                last_event: row.cells[4].text.clone(),
                detail_link,
            }
        })
        .collect();

    debug!("Extracted {} case row(s) from {} row(s)", cases.len(), rows.len());
    cases
}

/// Display text of a cell plus its link resolved to an absolute URL.
///
/// Cells without a link fall back to their plain text.
fn text_and_link(cell: &GridCell, base_url: &Url) -> (String, Option<String>) {
    match &cell.link {
        Some(link) => (
            link.text.clone(),
            link.href.as_deref().and_then(|href| resolve_link(base_url, href)),
        ),
        None => (cell.text.clone(), None),
    }
}

/// Resolve a grid link against the portal base URL.
///
/// Absolute `http(s)` targets are returned unchanged.
pub fn resolve_link(base_url: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(href.to_string());
    }

    base_url.join(href).ok().map(|u| u.to_string())
}
