use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, CreateGlobalSecondaryIndexAction, IndexStatus as RemoteIndexStatus,
    KeySchemaElement, KeyType, Projection as RemoteProjection, ProjectionType,
    ProvisionedThroughput, ScalarAttributeType,
};
use model::index::{AttributeType, GsiSpec, IndexStatus, Projection};

/// Attribute definitions the table must know about before the index
/// key schema can reference them.
pub(crate) fn attribute_definitions(spec: &GsiSpec) -> Result<Vec<AttributeDefinition>, BuildError> {
    spec.key_attributes
        .iter()
        .map(|key| {
            AttributeDefinition::builder()
                .attribute_name(&key.attribute_name)
                .attribute_type(scalar_type(key.attribute_type))
                .build()
        })
        .collect()
}

/// The creation action for one index. The first key attribute is the
/// partition key, the optional second one the sort key.
pub(crate) fn create_action(spec: &GsiSpec) -> Result<CreateGlobalSecondaryIndexAction, BuildError> {
    let key_schema: Vec<KeySchemaElement> = spec
        .key_attributes
        .iter()
        .enumerate()
        .map(|(position, key)| {
            let key_type: KeyType = if position == 0 {
                KeyType::Hash
            } else {
                KeyType::Range
            };

            KeySchemaElement::builder()
                .attribute_name(&key.attribute_name)
                .key_type(key_type)
                .build()
        })
        .collect::<Result<Vec<KeySchemaElement>, BuildError>>()?;

    let mut builder = CreateGlobalSecondaryIndexAction::builder()
        .index_name(&spec.index_name)
        .set_key_schema(Some(key_schema))
        .projection(projection(&spec.projection));

    if let Some(throughput) = &spec.throughput {
        builder = builder.provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(throughput.read_capacity_units)
                .write_capacity_units(throughput.write_capacity_units)
                .build()?,
        );
    }

    builder.build()
}

fn projection(projection: &Projection) -> RemoteProjection {
    match projection {
        Projection::All => RemoteProjection::builder()
            .projection_type(ProjectionType::All)
            .build(),
        Projection::KeysOnly => RemoteProjection::builder()
            .projection_type(ProjectionType::KeysOnly)
            .build(),
        Projection::Include { non_key_attributes } => RemoteProjection::builder()
            .projection_type(ProjectionType::Include)
            .set_non_key_attributes(Some(non_key_attributes.clone()))
            .build(),
    }
}

fn scalar_type(attribute_type: AttributeType) -> ScalarAttributeType {
    match attribute_type {
        AttributeType::S => ScalarAttributeType::S,
        AttributeType::N => ScalarAttributeType::N,
        AttributeType::B => ScalarAttributeType::B,
    }
}

/// UPDATING still converges towards ACTIVE, so it keeps the poller
/// going. Statuses this client does not recognize surface as FAILED
/// rather than being silently treated as transient.
pub(crate) fn index_status(status: Option<&RemoteIndexStatus>) -> IndexStatus {
    match status {
        Some(RemoteIndexStatus::Active) => IndexStatus::Active,
        Some(RemoteIndexStatus::Creating) | Some(RemoteIndexStatus::Updating) => {
            IndexStatus::Creating
        }
        Some(RemoteIndexStatus::Deleting) => IndexStatus::Deleting,
        _ => IndexStatus::Failed,
    }
}
