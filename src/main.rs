use aws_config::BehaviorVersion;
use lambda_runtime::{service_fn, tracing, Error};
use model::env;
use status_dynamodb::DynamoStatusClient;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use workflow::{lifecycle_fn, ExecutionMode, Provisioner};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let status_client: DynamoStatusClient =
        DynamoStatusClient::new(aws_sdk_dynamodb::Client::new(&config));

    let mode: ExecutionMode = match std::env::var(env::EXECUTION_MODE) {
        Ok(value) => ExecutionMode::from_str(&value)?,
        Err(_) => ExecutionMode::Sequential,
    };

    let mut provisioner: Provisioner = Provisioner::new(Arc::new(status_client), mode);

    if let Ok(seconds) = std::env::var(env::POLL_INTERVAL_SECONDS) {
        provisioner = provisioner.with_poll_interval(Duration::from_secs(seconds.parse()?));
    }

    lambda_runtime::run(service_fn(lifecycle_fn(&provisioner))).await
}
