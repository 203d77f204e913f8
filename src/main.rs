use anyhow::Context;
use clap::Parser;
use users_lambda::core::Connector;
use users_lambda::utils::logger;
use users_lambda::{ApiResponse, CliConfig, HandlerConfig, MemoryConnector, PgConnector, UserHandler};

async fn invoke<C: Connector>(connector: C, event: &serde_json::Value) -> ApiResponse {
    UserHandler::new(connector).handle(event).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    let event = config.load_event().context("failed to build invocation event")?;

    let response = if config.memory {
        tracing::info!("Using in-memory users table");
        invoke(MemoryConnector::new(), &event).await
    } else {
        let handler_config = HandlerConfig::from_env()
            .context("database configuration is incomplete (DB_HOST, DB_PORT, DB_NAME, DB_USER, DB_PASSWORD, DB_HOST_READ)")?;
        invoke(PgConnector::new(handler_config), &event).await
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
