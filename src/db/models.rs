//! Database models for the parties/cases schema

use crate::extract::CaseListing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Parties
// ============================================================================

/// Party - Matches parties table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Party {
    pub id: i64,
    pub name: String,
}

/// Party with its live case count (derived, never stored)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PartySummary {
    pub id: i64,
    pub name: String,
    pub total_cases: i64,
}

/// Result of an explicit party deletion
#[derive(Debug, Clone, Serialize)]
pub struct DeletedParty {
    pub party: Party,
    pub cases_removed: i64,
}

// ============================================================================
// Cases
// ============================================================================

/// Case - Matches cases table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Case {
    pub id: i64,
    pub case_number: String,
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
    pub subject: Option<String>,
    pub last_event: Option<String>,
    pub detail_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub party_id: i64,
}

/// NewCase - For inserting new cases
#[derive(Debug, Clone)]
pub struct NewCase {
    pub case_number: String,
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
    pub subject: Option<String>,
    pub last_event: Option<String>,
    pub detail_link: Option<String>,
}

impl From<&CaseListing> for NewCase {
    fn from(listing: &CaseListing) -> Self {
        Self {
            case_number: listing.case_number.clone(),
            plaintiff: Some(listing.plaintiff.clone()),
            defendant: Some(listing.defendant.clone()),
            subject: Some(listing.subject.clone()),
            last_event: Some(listing.last_event.clone()),
            detail_link: listing.detail_link.clone(),
        }
    }
}
