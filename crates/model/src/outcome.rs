use crate::index::IndexStatus;
use serde::Serialize;
use std::collections::BTreeMap;

/// Terminal result of one index within a provisioning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "State", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexReport {
    /// The index reached ACTIVE.
    Ready,
    /// The index failed to converge; the last observed status and the
    /// failure are preserved verbatim.
    Failed {
        #[serde(rename = "Status")]
        status: IndexStatus,
        #[serde(rename = "Error")]
        error: String,
    },
    /// Sequential execution stopped before reaching this index.
    NotAttempted,
}

/// Aggregate result of a provisioning run, built incrementally as each
/// single-index workflow reaches a terminal state.
#[derive(Debug, Clone, Default)]
pub struct ProvisioningOutcome {
    pub per_index: BTreeMap<String, IndexReport>,
}

impl ProvisioningOutcome {
    pub fn record(&mut self, index_name: &str, report: IndexReport) {
        self.per_index.insert(index_name.to_string(), report);
    }

    /// The run succeeded only if every index reached ACTIVE.
    pub fn success(&self) -> bool {
        self.per_index
            .values()
            .all(|report| matches!(report, IndexReport::Ready))
    }

    pub fn report(&self, index_name: &str) -> Option<&IndexReport> {
        self.per_index.get(index_name)
    }
}
