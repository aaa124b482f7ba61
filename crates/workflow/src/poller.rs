use crate::error::ProvisionError;
use crate::single::check_index;
use lambda_runtime::tracing;
use model::index::IndexStatus;
use status::StatusClient;
use std::time::Duration;
use tokio::time::Instant;

/// Default interval between status reads
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Polls an index at a fixed interval until it reaches a terminal
/// state or the deadline passes.
///
/// One status read per iteration, no other side effects. The deadline
/// is absolute from construction so sequential callers can share one
/// budget across several indexes.
pub struct ReadinessPoller {
    interval: Duration,
    deadline: Instant,
}

impl ReadinessPoller {
    pub fn new(interval: Duration, budget: Duration) -> Self {
        ReadinessPoller {
            interval,
            deadline: Instant::now() + budget,
        }
    }

    /// Sleep-then-check until ACTIVE.
    ///
    /// FAILED and NOT_FOUND are terminal failures; NOT_FOUND after the
    /// index was already observed means it vanished mid-flight rather
    /// than never having started.
    pub async fn wait_until_active(
        &self,
        client: &dyn StatusClient,
        table_name: &str,
        index_name: &str,
    ) -> Result<(), ProvisionError> {
        let started: Instant = Instant::now();
        let mut last_status: IndexStatus = IndexStatus::Creating;

        loop {
            if Instant::now() >= self.deadline {
                return Err(ProvisionError::DeadlineExceeded {
                    index_name: index_name.to_string(),
                    waited: started.elapsed(),
                    last_status,
                });
            }

            tokio::time::sleep(self.interval).await;

            match check_index(client, table_name, index_name).await? {
                IndexStatus::Active => {
                    tracing::info!(index_name, "Index is ACTIVE");

                    return Ok(());
                }
                IndexStatus::Failed => {
                    return Err(ProvisionError::IndexFailedRemote {
                        index_name: index_name.to_string(),
                    })
                }
                IndexStatus::NotFound => {
                    return Err(ProvisionError::IndexVanished {
                        index_name: index_name.to_string(),
                    })
                }
                status => {
                    tracing::info!(index_name, status = %status, "Waiting for index to become ACTIVE");

                    last_status = status;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use status_in_memory::ScriptedStatusClient;

    #[tokio::test(start_paused = true)]
    async fn creating_converges_to_active() {
        let client: ScriptedStatusClient = ScriptedStatusClient::new().with_index(
            "gsi1",
            &[
                IndexStatus::Creating,
                IndexStatus::Creating,
                IndexStatus::Creating,
                IndexStatus::Active,
            ],
        );

        let poller: ReadinessPoller =
            ReadinessPoller::new(DEFAULT_POLL_INTERVAL, Duration::from_secs(900));

        poller
            .wait_until_active(&client, "orders", "gsi1")
            .await
            .expect("Index should become ACTIVE");
    }

    #[tokio::test(start_paused = true)]
    async fn remote_failure_is_terminal() {
        let client: ScriptedStatusClient = ScriptedStatusClient::new()
            .with_index("gsi1", &[IndexStatus::Creating, IndexStatus::Failed]);

        let poller: ReadinessPoller =
            ReadinessPoller::new(DEFAULT_POLL_INTERVAL, Duration::from_secs(900));

        let error: ProvisionError = poller
            .wait_until_active(&client, "orders", "gsi1")
            .await
            .unwrap_err();

        assert!(matches!(error, ProvisionError::IndexFailedRemote { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn vanished_index_is_distinct_from_never_started() {
        let client: ScriptedStatusClient = ScriptedStatusClient::new()
            .with_index("gsi1", &[IndexStatus::Creating, IndexStatus::NotFound]);

        let poller: ReadinessPoller =
            ReadinessPoller::new(DEFAULT_POLL_INTERVAL, Duration::from_secs(900));

        let error: ProvisionError = poller
            .wait_until_active(&client, "orders", "gsi1")
            .await
            .unwrap_err();

        assert!(matches!(error, ProvisionError::IndexVanished { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn deleting_keeps_the_poller_waiting() {
        let client: ScriptedStatusClient =
            ScriptedStatusClient::new().with_index("gsi1", &[IndexStatus::Deleting]);

        let poller: ReadinessPoller =
            ReadinessPoller::new(DEFAULT_POLL_INTERVAL, Duration::from_secs(25));

        let error: ProvisionError = poller
            .wait_until_active(&client, "orders", "gsi1")
            .await
            .unwrap_err();

        // DELETING is transient: the poller waits rather than failing,
        // and records it as the last observed status
        match error {
            ProvisionError::DeadlineExceeded { last_status, .. } => {
                assert_eq!(IndexStatus::Deleting, last_status);
            }
            other => panic!("expected a deadline failure, got {}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_bounds_a_stuck_index() {
        let client: ScriptedStatusClient =
            ScriptedStatusClient::new().with_index("gsi1", &[IndexStatus::Creating]);

        let poller: ReadinessPoller =
            ReadinessPoller::new(DEFAULT_POLL_INTERVAL, Duration::from_secs(25));

        let error: ProvisionError = poller
            .wait_until_active(&client, "orders", "gsi1")
            .await
            .unwrap_err();

        match error {
            ProvisionError::DeadlineExceeded { last_status, .. } => {
                assert_eq!(IndexStatus::Creating, last_status);
            }
            other => panic!("expected a deadline failure, got {}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn describe_failure_mid_poll_is_fatal() {
        let client: ScriptedStatusClient = ScriptedStatusClient::new().with_missing_table();

        let poller: ReadinessPoller =
            ReadinessPoller::new(DEFAULT_POLL_INTERVAL, Duration::from_secs(900));

        let error: ProvisionError = poller
            .wait_until_active(&client, "orders", "gsi1")
            .await
            .unwrap_err();

        assert!(matches!(error, ProvisionError::Describe { .. }));
    }
}
