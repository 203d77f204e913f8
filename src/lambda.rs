use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use users_lambda::utils::logger;
use users_lambda::{ApiResponse, HandlerConfig, PgConnector, UserHandler};

async fn function_handler(
    handler: &UserHandler<PgConnector>,
    event: LambdaEvent<Value>,
) -> Result<ApiResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Invocation started");
    let response = handler.handle(&event.payload).await;
    tracing::info!(status = %response.status_code, "Invocation finished");
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // Fail the cold start rather than every request
    let config = HandlerConfig::from_env()?;

    let handler = UserHandler::new(PgConnector::new(config));
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(handler, event).await
    }))
    .await
}
