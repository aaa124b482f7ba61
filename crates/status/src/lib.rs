use async_trait::async_trait;
use model::index::{GsiSpec, IndexStatus};
use model::Error;
use std::fmt::{Display, Formatter};

/// Read and mutate index state on the managed table service.
///
/// A describe returns the table's current secondary indexes; a
/// submission requests creation of one index and returns as soon as
/// the mutation is accepted, long before the index is usable.
#[async_trait]
pub trait StatusClient: Send + Sync {
    async fn describe_indexes(&self, table_name: &str) -> Result<Vec<IndexDescription>, StatusError>;

    async fn submit_index_creation(
        &self,
        table_name: &str,
        spec: &GsiSpec,
    ) -> Result<CreationAck, StatusError>;
}

/// Name and status of one index as currently reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescription {
    pub index_name: String,
    pub status: IndexStatus,
}

/// Outcome of an accepted creation submission.
///
/// `AlreadyExists` absorbs the service's own idempotency race: a
/// concurrent creation of the same index is submission success, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationAck {
    Accepted,
    AlreadyExists,
}

/// Errors arising from the service boundary.
#[derive(Debug)]
pub struct StatusError {
    pub table_name: String,

    pub operation: StatusOperation,
    pub reason: StatusErrorReason,
}

#[derive(Debug)]
pub enum StatusErrorReason {
    // The table itself could not be described
    TableMissing,
    // The service rejected the index specification
    InvalidSpecification(String),
    // An error from the underlying service call
    BackendFailure(Error),
}

#[derive(Debug, Clone, Copy)]
pub enum StatusOperation {
    DescribeIndexes,
    SubmitIndexCreation,
}

impl StatusError {
    pub fn new(table_name: String, operation: StatusOperation, reason: StatusErrorReason) -> Self {
        StatusError {
            table_name,
            operation,
            reason,
        }
    }
}

impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} failed for table [{}]: {:?}",
            self.operation, self.table_name, self.reason
        )
    }
}

impl std::error::Error for StatusError {}
