//! Report types for the orphan sweep.

use serde::Serialize;

use crate::types::Timestamp;

/// Outcome of one [`super::sweep_orphans`] run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Assets found in the asset store.
    pub scanned: usize,
    /// Distinct references held by records.
    pub referenced: usize,
    pub orphans_removed: usize,
    pub bytes_reclaimed: u64,
    /// Unreferenced assets spared because they are younger than the grace period.
    pub skipped_recent: usize,
    pub errors: Vec<String>,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
}

impl SweepReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
