//! Runs against a real database. Needs DB_HOST, DB_PORT, DB_NAME, DB_USER,
//! DB_PASSWORD and DB_HOST_READ, and a server that accepts TLS.
//!
//! cargo test --test postgres_test -- --ignored

use anyhow::Result;
use serde_json::{json, Value};
use users_lambda::core::handler::ensure_seed;
use users_lambda::core::{ConnectionRole, Connector, UserStore};
use users_lambda::{HandlerConfig, PgConnector, UserHandler};

#[tokio::test]
#[ignore = "requires a PostgreSQL server"]
async fn test_round_trip_against_postgres() -> Result<()> {
    let config = HandlerConfig::from_env()?;
    let connector = PgConnector::new(config);

    // Schema creation twice in a row must not fail
    let mut store = connector.connect(ConnectionRole::Writer).await?;
    store.ensure_schema().await?;
    store.ensure_schema().await?;
    ensure_seed(&mut store).await?;
    let before = store.count_users().await?;
    assert!(before >= 3);
    assert!(!ensure_seed(&mut store).await?);
    store.close().await?;

    let handler = UserHandler::new(connector);
    let email = format!("ann+{}@x.com", chrono::Utc::now().timestamp_micros());
    let event = json!({
        "httpMethod": "POST",
        "path": "/insert",
        "body": json!({ "name": "Ann", "email": email }).to_string()
    });

    let response = handler.handle(&event).await;
    assert_eq!(response.status_code, "200", "body: {}", response.body);
    let body: Value = serde_json::from_str(&response.body)?;
    assert_eq!(body["user"]["email"], email.as_str());

    let response = handler.handle(&event).await;
    assert_eq!(response.status_code, "400");
    let message: String = serde_json::from_str(&response.body)?;
    assert_eq!(
        message,
        "duplicate key value violates unique constraint \"users_email_key\""
    );

    let response = handler
        .handle(&json!({ "httpMethod": "GET", "path": "/users" }))
        .await;
    assert_eq!(response.status_code, "200");
    let body: Value = serde_json::from_str(&response.body)?;
    let users = body["users"].as_array().expect("users array");
    assert!(users.len() as i64 >= before);
    Ok(())
}
