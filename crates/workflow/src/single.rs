use crate::error::ProvisionError;
use crate::poller::ReadinessPoller;
use lambda_runtime::tracing;
use model::index::{GsiSpec, IndexStatus};
use status::{CreationAck, StatusClient};

/// Look up the current status of one index, `NotFound` if the table
/// does not define it. A failed table read is fatal to the caller.
pub async fn check_index(
    client: &dyn StatusClient,
    table_name: &str,
    index_name: &str,
) -> Result<IndexStatus, ProvisionError> {
    let descriptions = client
        .describe_indexes(table_name)
        .await
        .map_err(|source| ProvisionError::Describe {
            index_name: index_name.to_string(),
            source,
        })?;

    let status: IndexStatus = descriptions
        .iter()
        .find(|description| description.index_name == index_name)
        .map(|description| description.status)
        .unwrap_or(IndexStatus::NotFound);

    Ok(status)
}

/// States of the single-index workflow. `Ready` and `Failed` are
/// terminal.
enum WorkflowState {
    Check,
    Create,
    Poll,
    Ready,
    Failed(ProvisionError),
}

/// Drives one index to a terminal state: check what already exists,
/// create if absent, poll until ACTIVE.
///
/// The workflow always re-checks current status first, which makes
/// repeated runs idempotent: an index that is already ACTIVE reports
/// success without another creation mutation.
pub struct SingleIndexWorkflow<'a> {
    client: &'a dyn StatusClient,
    poller: &'a ReadinessPoller,
    table_name: &'a str,
}

impl<'a> SingleIndexWorkflow<'a> {
    pub fn new(
        client: &'a dyn StatusClient,
        poller: &'a ReadinessPoller,
        table_name: &'a str,
    ) -> Self {
        SingleIndexWorkflow {
            client,
            poller,
            table_name,
        }
    }

    pub async fn run(&self, spec: &GsiSpec) -> Result<(), ProvisionError> {
        let index_name: &str = &spec.index_name;
        let mut state: WorkflowState = WorkflowState::Check;

        loop {
            state = match state {
                WorkflowState::Check => {
                    match check_index(self.client, self.table_name, index_name).await {
                        Ok(IndexStatus::Active) => {
                            tracing::info!(index_name, "Index already ACTIVE");

                            WorkflowState::Ready
                        }
                        // Someone else started it; wait alongside them
                        Ok(IndexStatus::Creating | IndexStatus::Deleting) => WorkflowState::Poll,
                        Ok(IndexStatus::NotFound) => WorkflowState::Create,
                        Ok(IndexStatus::Failed) => WorkflowState::Failed(
                            ProvisionError::IndexFailedRemote {
                                index_name: index_name.to_string(),
                            },
                        ),
                        Err(error) => WorkflowState::Failed(error),
                    }
                }
                WorkflowState::Create => {
                    match self
                        .client
                        .submit_index_creation(self.table_name, spec)
                        .await
                    {
                        Ok(CreationAck::Accepted) => {
                            tracing::info!(index_name, "Index creation submitted");

                            WorkflowState::Poll
                        }
                        Ok(CreationAck::AlreadyExists) => {
                            tracing::info!(index_name, "Index creation raced, already exists");

                            WorkflowState::Poll
                        }
                        Err(source) => WorkflowState::Failed(ProvisionError::CreationRejected {
                            index_name: index_name.to_string(),
                            source,
                        }),
                    }
                }
                WorkflowState::Poll => {
                    match self
                        .poller
                        .wait_until_active(self.client, self.table_name, index_name)
                        .await
                    {
                        Ok(()) => WorkflowState::Ready,
                        Err(error) => WorkflowState::Failed(error),
                    }
                }
                WorkflowState::Ready => return Ok(()),
                WorkflowState::Failed(error) => {
                    tracing::error!(index_name, %error, "Index failed to provision");

                    return Err(error);
                }
            };
        }
    }
}
