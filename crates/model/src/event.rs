use crate::index::GsiSpec;
use crate::outcome::IndexReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A CloudFormation custom resource lifecycle event.
///
/// The request kind is a closed tagged variant: an unrecognized
/// `RequestType` fails deserialization instead of being guessed at.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "RequestType")]
pub enum LifecycleEvent {
    Create(CreateEvent),
    Update(UpdateEvent),
    Delete(DeleteEvent),
}

impl LifecycleEvent {
    /// The request id correlating this event with its acknowledgment.
    pub fn request_id(&self) -> &str {
        match self {
            LifecycleEvent::Create(event) => &event.request_id,
            LifecycleEvent::Update(event) => &event.request_id,
            LifecycleEvent::Delete(event) => &event.request_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateEvent {
    pub request_id: String,
    pub stack_id: String,
    pub logical_resource_id: String,
    pub resource_properties: ResourceProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateEvent {
    pub request_id: String,
    pub stack_id: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    pub resource_properties: ResourceProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteEvent {
    pub request_id: String,
    pub stack_id: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
}

/// Properties supplied by the provisioning tool: the target table and
/// the full set of indexes it should end up with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceProperties {
    pub table_name: String,
    #[serde(default)]
    pub indexes: Vec<GsiSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AckStatus {
    Success,
    Failed,
}

/// The acknowledgment returned to the provisioning tool.
/// Every lifecycle event produces exactly one of these, success or not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Acknowledgment {
    pub status: AckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub data: AckData,
}

impl Acknowledgment {
    pub fn is_success(&self) -> bool {
        self.status == AckStatus::Success
    }
}

/// Per-index detail carried back in the acknowledgment, so a retry of
/// the whole request can tell which indexes already converged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AckData {
    pub details: BTreeMap<String, IndexReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_event_deserializes() {
        let event: LifecycleEvent = serde_json::from_value(json!({
            "RequestType": "Create",
            "RequestId": "req-1",
            "StackId": "stack-1",
            "LogicalResourceId": "GsiUpdater",
            "ResourceProperties": {
                "TableName": "orders",
                "Indexes": [{
                    "IndexName": "gsi1",
                    "KeyAttributes": [
                        { "AttributeName": "gsi1pk", "AttributeType": "S" },
                        { "AttributeName": "gsi1sk", "AttributeType": "S" },
                    ],
                    "Projection": { "ProjectionType": "ALL" },
                    "Throughput": { "ReadCapacityUnits": 5, "WriteCapacityUnits": 5 },
                }],
            },
        }))
        .unwrap();

        match event {
            LifecycleEvent::Create(create) => {
                assert_eq!("orders", create.resource_properties.table_name);
                assert_eq!(1, create.resource_properties.indexes.len());
                assert_eq!("gsi1", create.resource_properties.indexes[0].index_name);
            }
            other => panic!("expected a create event, got {:?}", other),
        }
    }

    #[test]
    fn delete_event_tolerates_missing_physical_id() {
        let event: LifecycleEvent = serde_json::from_value(json!({
            "RequestType": "Delete",
            "RequestId": "req-2",
            "StackId": "stack-1",
            "LogicalResourceId": "GsiUpdater",
        }))
        .unwrap();

        match event {
            LifecycleEvent::Delete(delete) => assert!(delete.physical_resource_id.is_none()),
            other => panic!("expected a delete event, got {:?}", other),
        }
    }

    #[test]
    fn unrecognized_request_type_is_an_error() {
        let result = serde_json::from_value::<LifecycleEvent>(json!({
            "RequestType": "Upsert",
            "RequestId": "req-3",
            "StackId": "stack-1",
            "LogicalResourceId": "GsiUpdater",
        }));

        assert!(result.is_err());
    }
}
