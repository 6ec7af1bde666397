//! Snapshot export of a lookup's per-party results

use crate::error::Result;
use crate::report::PartyResult;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes one JSON file per query name into a data directory
#[derive(Debug, Clone)]
pub struct SnapshotExporter {
    data_dir: PathBuf,
}

impl SnapshotExporter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File the snapshot for `query_name` is written to
    pub fn path_for(&self, query_name: &str) -> PathBuf {
        self.data_dir
            .join(format!("results_{}.json", snapshot_key(query_name)))
    }

    /// Write `results` for `query_name`, replacing any earlier snapshot.
    ///
    /// An empty result list is not written; returns `None` in that case.
    pub fn export(&self, query_name: &str, results: &[PartyResult]) -> Result<Option<PathBuf>> {
        if results.is_empty() {
            return Ok(None);
        }

        std::fs::create_dir_all(&self.data_dir)?;

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        results.serialize(&mut serializer)?;

        let path = self.path_for(query_name);
        std::fs::write(&path, buf)?;

        info!("✓ Snapshot saved to: {}", path.display());
        Ok(Some(path))
    }
}

/// File-name key for a query: spaces and path separators become underscores
fn snapshot_key(query_name: &str) -> String {
    query_name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}
