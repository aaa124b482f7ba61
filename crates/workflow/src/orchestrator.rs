use crate::error::ProvisionError;
use crate::poller::{ReadinessPoller, DEFAULT_POLL_INTERVAL};
use crate::single::SingleIndexWorkflow;
use model::index::GsiSpec;
use model::outcome::{IndexReport, ProvisioningOutcome};
use model::ProvisioningRequest;
use status::StatusClient;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Ceiling for a whole sequential run, matching the enclosing
/// execution environment's 15 minute limit
pub const SEQUENTIAL_RUN_BUDGET: Duration = Duration::from_secs(900);
/// Per-index ceiling when indexes are provisioned concurrently
pub const PARALLEL_INDEX_BUDGET: Duration = Duration::from_secs(300);

/// How the orchestrator walks the index list.
///
/// Sequential bounds peak load on the table and shares one time budget
/// across the run; parallel bounds wall-clock time to the slowest
/// index at the cost of tracking each workflow independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Parallel,
}

impl FromStr for ExecutionMode {
    type Err = model::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SEQUENTIAL" => Ok(ExecutionMode::Sequential),
            "PARALLEL" => Ok(ExecutionMode::Parallel),
            other => Err(format!("unrecognized execution mode [{}]", other).into()),
        }
    }
}

/// Applies the single-index workflow across a provisioning request and
/// aggregates one outcome.
pub struct Provisioner {
    status_client: Arc<dyn StatusClient>,
    mode: ExecutionMode,
    poll_interval: Duration,
}

impl Provisioner {
    pub fn new(status_client: Arc<dyn StatusClient>, mode: ExecutionMode) -> Self {
        Provisioner {
            status_client,
            mode,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;

        self
    }

    pub async fn provision(&self, request: &ProvisioningRequest) -> ProvisioningOutcome {
        match self.mode {
            ExecutionMode::Sequential => self.provision_sequential(request).await,
            ExecutionMode::Parallel => self.provision_parallel(request).await,
        }
    }

    /// One index at a time in list order, stopping at the first
    /// failure. Indexes never reached are reported as not attempted;
    /// indexes already finished keep their true terminal state.
    async fn provision_sequential(&self, request: &ProvisioningRequest) -> ProvisioningOutcome {
        let mut outcome: ProvisioningOutcome = ProvisioningOutcome::default();

        let poller: ReadinessPoller =
            ReadinessPoller::new(self.poll_interval, SEQUENTIAL_RUN_BUDGET);
        let workflow: SingleIndexWorkflow =
            SingleIndexWorkflow::new(self.status_client.as_ref(), &poller, &request.table_name);

        let mut remaining = request.indexes.iter();

        for spec in remaining.by_ref() {
            match workflow.run(spec).await {
                Ok(()) => outcome.record(&spec.index_name, IndexReport::Ready),
                Err(error) => {
                    outcome.record(&spec.index_name, failure_report(error));

                    break;
                }
            }
        }

        for spec in remaining {
            outcome.record(&spec.index_name, IndexReport::NotAttempted);
        }

        outcome
    }

    /// All indexes at once, each polled independently; completes only
    /// when every workflow has reached a terminal state.
    async fn provision_parallel(&self, request: &ProvisioningRequest) -> ProvisioningOutcome {
        let workflows = request.indexes.iter().map(|spec: &GsiSpec| async move {
            let poller: ReadinessPoller =
                ReadinessPoller::new(self.poll_interval, PARALLEL_INDEX_BUDGET);
            let workflow: SingleIndexWorkflow = SingleIndexWorkflow::new(
                self.status_client.as_ref(),
                &poller,
                &request.table_name,
            );

            (spec.index_name.clone(), workflow.run(spec).await)
        });

        let results: Vec<(String, Result<(), ProvisionError>)> =
            futures::future::join_all(workflows).await;

        let mut outcome: ProvisioningOutcome = ProvisioningOutcome::default();

        for (index_name, result) in results {
            match result {
                Ok(()) => outcome.record(&index_name, IndexReport::Ready),
                Err(error) => outcome.record(&index_name, failure_report(error)),
            }
        }

        outcome
    }
}

fn failure_report(error: ProvisionError) -> IndexReport {
    IndexReport::Failed {
        status: error.last_status(),
        error: error.to_string(),
    }
}
