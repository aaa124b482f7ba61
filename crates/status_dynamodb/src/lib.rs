use async_trait::async_trait;
use aws_sdk_dynamodb::error::ProvideErrorMetadata;
use aws_sdk_dynamodb::operation::describe_table::{DescribeTableError, DescribeTableOutput};
use aws_sdk_dynamodb::operation::update_table::UpdateTableError;
use aws_sdk_dynamodb::types::{GlobalSecondaryIndexUpdate, TableDescription};
use model::index::GsiSpec;
use status::StatusErrorReason::{BackendFailure, InvalidSpecification, TableMissing};
use status::StatusOperation::{DescribeIndexes, SubmitIndexCreation};
use status::{CreationAck, IndexDescription, StatusClient, StatusError};

mod convert;

/// `StatusClient` backed by the DynamoDB control plane.
///
/// Describes are DescribeTable reads; creations are UpdateTable
/// mutations carrying a single `GlobalSecondaryIndexUpdate::Create`.
/// The client is passed in at construction so tests can substitute a
/// mocked one.
pub struct DynamoStatusClient {
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl DynamoStatusClient {
    pub fn new(dynamodb_client: aws_sdk_dynamodb::Client) -> Self {
        DynamoStatusClient { dynamodb_client }
    }
}

#[async_trait]
impl StatusClient for DynamoStatusClient {
    async fn describe_indexes(
        &self,
        table_name: &str,
    ) -> Result<Vec<IndexDescription>, StatusError> {
        let output: DescribeTableOutput = self
            .dynamodb_client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|err| {
                let reason = match err.as_service_error() {
                    Some(DescribeTableError::ResourceNotFoundException(_)) => TableMissing,
                    _ => BackendFailure(err.into()),
                };

                StatusError::new(table_name.to_string(), DescribeIndexes, reason)
            })?;

        let table: TableDescription = output.table.ok_or_else(|| {
            StatusError::new(table_name.to_string(), DescribeIndexes, TableMissing)
        })?;

        let descriptions: Vec<IndexDescription> = table
            .global_secondary_indexes()
            .iter()
            .filter_map(|gsi| {
                gsi.index_name().map(|name| IndexDescription {
                    index_name: name.to_string(),
                    status: convert::index_status(gsi.index_status()),
                })
            })
            .collect();

        Ok(descriptions)
    }

    async fn submit_index_creation(
        &self,
        table_name: &str,
        spec: &GsiSpec,
    ) -> Result<CreationAck, StatusError> {
        let action = convert::create_action(spec).map_err(|err| {
            StatusError::new(
                table_name.to_string(),
                SubmitIndexCreation,
                InvalidSpecification(err.to_string()),
            )
        })?;
        let definitions = convert::attribute_definitions(spec).map_err(|err| {
            StatusError::new(
                table_name.to_string(),
                SubmitIndexCreation,
                InvalidSpecification(err.to_string()),
            )
        })?;

        let result = self
            .dynamodb_client
            .update_table()
            .table_name(table_name)
            .set_attribute_definitions(Some(definitions))
            .global_secondary_index_updates(
                GlobalSecondaryIndexUpdate::builder().create(action).build(),
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(CreationAck::Accepted),
            // The service racing us to create the same index is
            // submission success, not an error
            Err(err) if mentions_already_exists(&err) => Ok(CreationAck::AlreadyExists),
            Err(err) => {
                let reason = match err.as_service_error() {
                    Some(UpdateTableError::ResourceNotFoundException(_)) => TableMissing,
                    _ => BackendFailure(err.into()),
                };

                Err(StatusError::new(
                    table_name.to_string(),
                    SubmitIndexCreation,
                    reason,
                ))
            }
        }
    }
}

fn mentions_already_exists(
    err: &aws_sdk_dynamodb::error::SdkError<
        UpdateTableError,
        aws_sdk_dynamodb::config::http::HttpResponse,
    >,
) -> bool {
    err.as_service_error()
        .and_then(ProvideErrorMetadata::message)
        .is_some_and(|message| message.contains("already exists"))
}
