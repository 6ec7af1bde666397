//! Results grid parsing
//!
//! Turns the outer HTML of a portal grid into rows of cells, keeping the
//! visible text of every `td` and the first hyperlink it holds.

use crate::error::{Result, ScraperError};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Hyperlink found inside a grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellLink {
    pub text: String,
    /// Raw `href` attribute; `None` when missing or blank
    pub href: Option<String>,
}

/// One `td` of a grid row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    /// Trimmed text with inner whitespace collapsed
    pub text: String,
    pub link: Option<CellLink>,
}

impl GridCell {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            link: None,
        }
    }
}

/// A data row of a results grid
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GridRow {
    pub cells: Vec<GridCell>,
}

impl GridRow {
    pub fn new(cells: Vec<GridCell>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::ParseError(format!("{}: {:?}", css, e)))
}

/// Parse grid HTML into data rows.
///
/// Header rows (only `th`) and empty rows are skipped. Cells are the direct
/// `td` children of each `tr`.
pub fn parse_grid_html(html: &str) -> Result<Vec<GridRow>> {
    let fragment = Html::parse_fragment(html);
    let row_selector = selector("tr")?;
    let link_selector = selector("a")?;

    let rows = fragment
        .select(&row_selector)
        .map(|tr| {
            let cells = tr
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name() == "td")
                .map(|td| parse_cell(td, &link_selector))
                .collect::<Vec<_>>();
            GridRow::new(cells)
        })
        .filter(|row| !row.is_empty())
        .collect();

    Ok(rows)
}

fn parse_cell(td: ElementRef<'_>, link_selector: &Selector) -> GridCell {
    let link = td.select(link_selector).next().map(|a| CellLink {
        text: collapse_whitespace(a.text()),
        href: a
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string),
    });

    GridCell {
        text: collapse_whitespace(td.text()),
        link,
    }
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
