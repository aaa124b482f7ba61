use aws_sdk_dynamodb::operation::describe_table::DescribeTableOutput;
use aws_sdk_dynamodb::types::{
    GlobalSecondaryIndexDescription, IndexStatus as RemoteIndexStatus, TableDescription,
};
use model::event::{CreateEvent, DeleteEvent, LifecycleEvent, ResourceProperties, UpdateEvent};
use model::index::{AttributeType, GsiSpec, KeyAttribute, Projection, Throughput};

/// A composite-key index specification with an ALL projection.
pub fn gsi_spec(index_name: &str) -> GsiSpec {
    GsiSpec {
        index_name: index_name.to_string(),
        key_attributes: vec![
            KeyAttribute {
                attribute_name: format!("{}pk", index_name),
                attribute_type: AttributeType::S,
            },
            KeyAttribute {
                attribute_name: format!("{}sk", index_name),
                attribute_type: AttributeType::S,
            },
        ],
        projection: Projection::All,
        throughput: Some(Throughput {
            read_capacity_units: 5,
            write_capacity_units: 5,
        }),
    }
}

/// A partition-key-only specification without a capacity hint, as used
/// against on-demand tables.
pub fn keys_only_spec(index_name: &str) -> GsiSpec {
    GsiSpec {
        index_name: index_name.to_string(),
        key_attributes: vec![KeyAttribute {
            attribute_name: format!("{}pk", index_name),
            attribute_type: AttributeType::S,
        }],
        projection: Projection::KeysOnly,
        throughput: None,
    }
}

/// Test identifiers shared by the event builders
pub const TEST_REQUEST_ID: &str = "request-1";
pub const TEST_STACK_ID: &str = "stack-1";
pub const TEST_LOGICAL_ID: &str = "GsiProvisioner";

pub fn create_event(table_name: &str, indexes: Vec<GsiSpec>) -> LifecycleEvent {
    LifecycleEvent::Create(CreateEvent {
        request_id: TEST_REQUEST_ID.to_string(),
        stack_id: TEST_STACK_ID.to_string(),
        logical_resource_id: TEST_LOGICAL_ID.to_string(),
        resource_properties: ResourceProperties {
            table_name: table_name.to_string(),
            indexes,
        },
    })
}

pub fn update_event(
    table_name: &str,
    indexes: Vec<GsiSpec>,
    physical_resource_id: Option<&str>,
) -> LifecycleEvent {
    LifecycleEvent::Update(UpdateEvent {
        request_id: TEST_REQUEST_ID.to_string(),
        stack_id: TEST_STACK_ID.to_string(),
        logical_resource_id: TEST_LOGICAL_ID.to_string(),
        physical_resource_id: physical_resource_id.map(str::to_string),
        resource_properties: ResourceProperties {
            table_name: table_name.to_string(),
            indexes,
        },
    })
}

pub fn delete_event(physical_resource_id: Option<&str>) -> LifecycleEvent {
    LifecycleEvent::Delete(DeleteEvent {
        request_id: TEST_REQUEST_ID.to_string(),
        stack_id: TEST_STACK_ID.to_string(),
        logical_resource_id: TEST_LOGICAL_ID.to_string(),
        physical_resource_id: physical_resource_id.map(str::to_string),
    })
}

/// A DescribeTable output listing the given indexes and their remote
/// statuses.
pub fn describe_output(
    table_name: &str,
    indexes: &[(&str, RemoteIndexStatus)],
) -> DescribeTableOutput {
    let mut table = TableDescription::builder().table_name(table_name);

    for (index_name, status) in indexes {
        table = table.global_secondary_indexes(
            GlobalSecondaryIndexDescription::builder()
                .index_name(*index_name)
                .index_status(status.clone())
                .build(),
        );
    }

    DescribeTableOutput::builder().table(table.build()).build()
}
