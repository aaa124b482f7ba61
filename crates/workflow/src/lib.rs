use lambda_runtime::LambdaEvent;
use model::event::{Acknowledgment, LifecycleEvent};
use model::Error;
use std::future::Future;
use std::pin::Pin;

mod error;
pub mod lifecycle;
pub mod orchestrator;
pub mod poller;
pub mod single;

pub use error::ProvisionError;
pub use lifecycle::handle;
pub use orchestrator::{ExecutionMode, Provisioner};

/// Creates a handler function for the provisioner designed for use
/// with `lambda_runtime::run()`.
///
/// The handler receives the lifecycle event and always resolves to an
/// acknowledgment; provisioning failures are reported inside it rather
/// than raised.
///
/// ```no_compile
/// let provisioner: Provisioner = Provisioner::new(client, ExecutionMode::Sequential);
///
/// lambda_runtime::run(service_fn(lifecycle_fn(&provisioner))).await
/// ```
pub fn lifecycle_fn<'a>(
    provisioner: &'a Provisioner,
) -> impl Fn(
    LambdaEvent<LifecycleEvent>,
) -> Pin<Box<dyn Future<Output = Result<Acknowledgment, Error>> + 'a>> + 'a {
    move |event: LambdaEvent<LifecycleEvent>| {
        Box::pin(async move { Ok(handle(provisioner, event.payload).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;
    use model::index::IndexStatus;
    use status_in_memory::ScriptedStatusClient;
    use std::sync::Arc;
    use test_utils::{create_event, gsi_spec};

    #[tokio::test(start_paused = true)]
    async fn handler_resolves_lambda_events_to_acknowledgments() {
        let client: Arc<ScriptedStatusClient> =
            Arc::new(ScriptedStatusClient::new().with_index("gsi1", &[IndexStatus::Active]));

        let provisioner: Provisioner = Provisioner::new(client, ExecutionMode::Sequential);
        let handler = lifecycle_fn(&provisioner);

        let event: LambdaEvent<LifecycleEvent> = LambdaEvent::new(
            create_event("orders", vec![gsi_spec("gsi1")]),
            Context::default(),
        );

        let ack: Acknowledgment = handler(event).await.unwrap();

        assert!(ack.is_success());
    }
}
