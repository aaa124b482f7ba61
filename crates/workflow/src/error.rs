use model::index::IndexStatus;
use status::StatusError;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// A single-index workflow failure.
///
/// Every variant names its index so the orchestrator can aggregate
/// per-index results without reinterpreting them.
#[derive(Debug)]
pub enum ProvisionError {
    // The status read itself failed
    Describe {
        index_name: String,
        source: StatusError,
    },
    // The creation mutation was rejected for a reason other than
    // "already exists"; never retried
    CreationRejected {
        index_name: String,
        source: StatusError,
    },
    // The index disappeared after having been observed, an external
    // deletion race
    IndexVanished {
        index_name: String,
    },
    // The service reported the terminal FAILED state
    IndexFailedRemote {
        index_name: String,
    },
    // The poller hit its deadline before the index converged
    DeadlineExceeded {
        index_name: String,
        waited: Duration,
        last_status: IndexStatus,
    },
}

impl ProvisionError {
    pub fn index_name(&self) -> &str {
        match self {
            ProvisionError::Describe { index_name, .. } => index_name,
            ProvisionError::CreationRejected { index_name, .. } => index_name,
            ProvisionError::IndexVanished { index_name } => index_name,
            ProvisionError::IndexFailedRemote { index_name } => index_name,
            ProvisionError::DeadlineExceeded { index_name, .. } => index_name,
        }
    }

    /// The last index status this failure implies, for the per-index
    /// report.
    pub fn last_status(&self) -> IndexStatus {
        match self {
            ProvisionError::IndexFailedRemote { .. } => IndexStatus::Failed,
            ProvisionError::DeadlineExceeded { last_status, .. } => *last_status,
            _ => IndexStatus::NotFound,
        }
    }
}

impl Display for ProvisionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvisionError::Describe { index_name, source } => {
                write!(f, "failed to read status of index [{}]: {}", index_name, source)
            }
            ProvisionError::CreationRejected { index_name, source } => {
                write!(f, "creation of index [{}] was rejected: {}", index_name, source)
            }
            ProvisionError::IndexVanished { index_name } => {
                write!(
                    f,
                    "index [{}] disappeared while waiting for it to become ACTIVE",
                    index_name
                )
            }
            ProvisionError::IndexFailedRemote { index_name } => {
                write!(f, "index [{}] reported FAILED", index_name)
            }
            ProvisionError::DeadlineExceeded {
                index_name,
                waited,
                last_status,
            } => {
                write!(
                    f,
                    "index [{}] did not become ACTIVE within {:?}, last status {}",
                    index_name, waited, last_status
                )
            }
        }
    }
}

impl std::error::Error for ProvisionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProvisionError::Describe { source, .. } => Some(source),
            ProvisionError::CreationRejected { source, .. } => Some(source),
            _ => None,
        }
    }
}
