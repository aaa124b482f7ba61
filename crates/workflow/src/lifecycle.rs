use crate::orchestrator::Provisioner;
use lambda_runtime::tracing;
use lambda_runtime::tracing::{Instrument, Span};
use model::event::{
    AckData, AckStatus, Acknowledgment, LifecycleEvent, ResourceProperties,
};
use model::outcome::{IndexReport, ProvisioningOutcome};
use model::ProvisioningRequest;
use std::collections::HashSet;

/// Translate one lifecycle event into orchestrator work and an
/// acknowledgment.
///
/// Always produces an acknowledgment: failures land in the status and
/// reason fields rather than escaping, since the calling provisioning
/// tool cannot otherwise learn the run's outcome.
pub async fn handle(provisioner: &Provisioner, event: LifecycleEvent) -> Acknowledgment {
    match event {
        LifecycleEvent::Create(create) => {
            // The request id becomes the stable identifier for this
            // provisioning action
            let physical_resource_id: String = create.request_id.clone();

            provision_and_acknowledge(
                provisioner,
                create.resource_properties,
                Identifiers {
                    physical_resource_id,
                    stack_id: create.stack_id,
                    request_id: create.request_id,
                    logical_resource_id: create.logical_resource_id,
                },
            )
            .await
        }
        LifecycleEvent::Update(update) => {
            let physical_resource_id: String = update
                .physical_resource_id
                .clone()
                .unwrap_or_else(|| update.request_id.clone());

            provision_and_acknowledge(
                provisioner,
                update.resource_properties,
                Identifiers {
                    physical_resource_id,
                    stack_id: update.stack_id,
                    request_id: update.request_id,
                    logical_resource_id: update.logical_resource_id,
                },
            )
            .await
        }
        // Indexes outlive the provisioning record: a removal event is
        // acknowledged without reversing any creation
        LifecycleEvent::Delete(delete) => {
            tracing::info!(request_id = delete.request_id, "Acknowledging removal, indexes are retained");

            Acknowledgment {
                status: AckStatus::Success,
                reason: None,
                physical_resource_id: delete
                    .physical_resource_id
                    .unwrap_or_else(|| delete.request_id.clone()),
                stack_id: delete.stack_id,
                request_id: delete.request_id,
                logical_resource_id: delete.logical_resource_id,
                data: AckData::default(),
            }
        }
    }
}

struct Identifiers {
    physical_resource_id: String,
    stack_id: String,
    request_id: String,
    logical_resource_id: String,
}

async fn provision_and_acknowledge(
    provisioner: &Provisioner,
    properties: ResourceProperties,
    identifiers: Identifiers,
) -> Acknowledgment {
    if let Err(reason) = validate(&properties) {
        tracing::error!(reason, "Rejecting lifecycle event");

        return acknowledgment(identifiers, AckStatus::Failed, Some(reason), AckData::default());
    }

    let request: ProvisioningRequest =
        ProvisioningRequest::new(properties.table_name, properties.indexes);

    let request_id: &str = &identifiers.request_id;
    let run_span: Span = tracing::span!(tracing::Level::INFO, "Provisioning", request_id);

    let outcome: ProvisioningOutcome =
        provisioner.provision(&request).instrument(run_span).await;

    let status: AckStatus = if outcome.success() {
        AckStatus::Success
    } else {
        AckStatus::Failed
    };

    acknowledgment(
        identifiers,
        status,
        failure_reason(&outcome),
        AckData {
            details: outcome.per_index,
        },
    )
}

fn acknowledgment(
    identifiers: Identifiers,
    status: AckStatus,
    reason: Option<String>,
    data: AckData,
) -> Acknowledgment {
    Acknowledgment {
        status,
        reason,
        physical_resource_id: identifiers.physical_resource_id,
        stack_id: identifiers.stack_id,
        request_id: identifiers.request_id,
        logical_resource_id: identifiers.logical_resource_id,
        data,
    }
}

/// Table and index invariants checked before any service call.
fn validate(properties: &ResourceProperties) -> Result<(), String> {
    if properties.table_name.is_empty() {
        return Err("table name must not be empty".to_string());
    }

    let mut seen: HashSet<&str> = HashSet::new();

    for spec in &properties.indexes {
        spec.validate().map_err(|violation| violation.to_string())?;

        if !seen.insert(&spec.index_name) {
            return Err(format!(
                "index name [{}] appears more than once in the request",
                spec.index_name
            ));
        }
    }

    Ok(())
}

/// Collect the per-index failures into one reason line.
fn failure_reason(outcome: &ProvisioningOutcome) -> Option<String> {
    let failures: Vec<String> = outcome
        .per_index
        .iter()
        .filter_map(|(index_name, report)| match report {
            IndexReport::Ready => None,
            IndexReport::Failed { error, .. } => Some(error.clone()),
            IndexReport::NotAttempted => Some(format!("index [{}] was not attempted", index_name)),
        })
        .collect();

    if failures.is_empty() {
        None
    } else {
        Some(failures.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::ExecutionMode;
    use model::index::IndexStatus;
    use status_in_memory::ScriptedStatusClient;
    use std::sync::Arc;
    use test_utils::{
        create_event, delete_event, gsi_spec, update_event, TEST_REQUEST_ID,
    };

    fn provisioner(client: Arc<ScriptedStatusClient>) -> Provisioner {
        Provisioner::new(client, ExecutionMode::Sequential)
    }

    #[tokio::test(start_paused = true)]
    async fn create_event_provisions_and_acknowledges_success() {
        let client: Arc<ScriptedStatusClient> = Arc::new(ScriptedStatusClient::new().with_index(
            "gsi1",
            &[
                IndexStatus::NotFound,
                IndexStatus::Creating,
                IndexStatus::Active,
            ],
        ));

        let ack: Acknowledgment = handle(
            &provisioner(client.clone()),
            create_event("orders", vec![gsi_spec("gsi1")]),
        )
        .await;

        assert!(ack.is_success());
        assert_eq!(TEST_REQUEST_ID, ack.physical_resource_id);
        assert_eq!(Some(&IndexReport::Ready), ack.data.details.get("gsi1"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_run_is_acknowledged_with_a_reason() {
        let client: Arc<ScriptedStatusClient> = Arc::new(
            ScriptedStatusClient::new()
                .with_index("gsi1", &[IndexStatus::NotFound])
                .with_rejected_creation("gsi1", "limit exceeded"),
        );

        let ack: Acknowledgment = handle(
            &provisioner(client.clone()),
            create_event("orders", vec![gsi_spec("gsi1")]),
        )
        .await;

        assert!(!ack.is_success());
        assert!(ack.reason.unwrap().contains("limit exceeded"));
    }

    #[tokio::test(start_paused = true)]
    async fn update_event_keeps_the_existing_physical_id() {
        let client: Arc<ScriptedStatusClient> =
            Arc::new(ScriptedStatusClient::new().with_index("gsi1", &[IndexStatus::Active]));

        let ack: Acknowledgment = handle(
            &provisioner(client.clone()),
            update_event("orders", vec![gsi_spec("gsi1")], Some("physical-1")),
        )
        .await;

        assert!(ack.is_success());
        assert_eq!("physical-1", ack.physical_resource_id);
        assert_eq!(0, client.creation_count("gsi1"));
    }

    #[tokio::test(start_paused = true)]
    async fn delete_event_acknowledges_without_service_calls() {
        let client: Arc<ScriptedStatusClient> = Arc::new(ScriptedStatusClient::new());

        let ack: Acknowledgment =
            handle(&provisioner(client.clone()), delete_event(None)).await;

        assert!(ack.is_success());
        // No prior creation on record: fall back to the request id
        assert_eq!(TEST_REQUEST_ID, ack.physical_resource_id);
        assert_eq!(0, client.describe_count());
        assert!(client.creations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn delete_event_echoes_the_recorded_physical_id() {
        let client: Arc<ScriptedStatusClient> = Arc::new(ScriptedStatusClient::new());

        let ack: Acknowledgment = handle(
            &provisioner(client.clone()),
            delete_event(Some("physical-1")),
        )
        .await;

        assert!(ack.is_success());
        assert_eq!("physical-1", ack.physical_resource_id);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_specification_fails_before_any_service_call() {
        let client: Arc<ScriptedStatusClient> = Arc::new(ScriptedStatusClient::new());

        let mut invalid = gsi_spec("gsi1");
        invalid.key_attributes.clear();

        let ack: Acknowledgment = handle(
            &provisioner(client.clone()),
            create_event("orders", vec![invalid]),
        )
        .await;

        assert!(!ack.is_success());
        assert_eq!(0, client.describe_count());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_table_name_fails_before_any_service_call() {
        let client: Arc<ScriptedStatusClient> = Arc::new(ScriptedStatusClient::new());

        let ack: Acknowledgment = handle(
            &provisioner(client.clone()),
            create_event("", vec![gsi_spec("gsi1")]),
        )
        .await;

        assert!(!ack.is_success());
        assert!(ack.reason.unwrap().contains("table name"));
        assert_eq!(0, client.describe_count());
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_index_names_are_rejected() {
        let client: Arc<ScriptedStatusClient> = Arc::new(ScriptedStatusClient::new());

        let ack: Acknowledgment = handle(
            &provisioner(client.clone()),
            create_event("orders", vec![gsi_spec("gsi1"), gsi_spec("gsi1")]),
        )
        .await;

        assert!(!ack.is_success());
        assert!(ack.reason.unwrap().contains("more than once"));
    }
}
