//! Lookup results: per-party results and the flattened report

use crate::extract::CaseListing;
use serde::{Deserialize, Serialize};

/// Everything collected for one matched party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyResult {
    pub party_name: String,
    pub tax_id: String,
    pub detail_link: Option<String>,
    pub cases: Vec<CaseListing>,
}

/// A case flattened together with the party it was found under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseWithParty {
    #[serde(flatten)]
    pub case: CaseListing,
    pub party: String,
    pub tax_id: String,
}

/// Report returned for a name that matched at least one party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupReport {
    pub queried_name: String,
    pub total_parties: usize,
    pub total_cases: usize,
    pub cases: Vec<CaseWithParty>,
}

impl LookupReport {
    pub fn from_results(queried_name: &str, results: &[PartyResult]) -> Self {
        let cases: Vec<CaseWithParty> = results
            .iter()
            .flat_map(|result| {
                result.cases.iter().map(move |case| CaseWithParty {
                    case: case.clone(),
                    party: result.party_name.clone(),
                    tax_id: result.tax_id.clone(),
                })
            })
            .collect();

        Self {
            queried_name: queried_name.to_string(),
            total_parties: results.len(),
            total_cases: cases.len(),
            cases,
        }
    }
}

/// Outcome of a lookup that did not fail
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found {
        report: LookupReport,
        parties: Vec<PartyResult>,
    },
    /// No party matched the name
    NotFound { queried_name: String },
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found { .. })
    }

    pub fn report(&self) -> Option<&LookupReport> {
        match self {
            LookupOutcome::Found { report, .. } => Some(report),
            LookupOutcome::NotFound { .. } => None,
        }
    }
}
