use crate::core::request::{ApiRequest, Route};
use crate::core::response::{ApiResponse, ResponseBody};
use crate::domain::model::seed_users;
use crate::domain::ports::{ConnectionRole, Connector, UserStore};
use crate::utils::error::Result;
use serde_json::Value;

/// Runs one invocation: connect, ensure schema and seed rows, dispatch,
/// release connections, shape the response.
pub struct UserHandler<C: Connector> {
    connector: C,
}

impl<C: Connector> UserHandler<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Never fails: every error becomes a 400 envelope.
    pub async fn handle(&self, event: &Value) -> ApiResponse {
        tracing::debug!(%event, "Received event");
        let request = ApiRequest::from_event(event);
        tracing::info!(
            method = request.method.as_deref().unwrap_or("undefined"),
            path = %request.path,
            "Handling request"
        );

        let mut connections = Connections::new();
        let outcome = self.process(&mut connections, &request).await;
        connections.release().await;

        match outcome {
            Ok(body) => ApiResponse::ok(&body),
            Err(e) => {
                tracing::error!(category = ?e.category(), error = %e, "Request failed");
                ApiResponse::error(&e)
            }
        }
    }

    async fn process(
        &self,
        connections: &mut Connections<C::Store>,
        request: &ApiRequest,
    ) -> Result<ResponseBody> {
        let writer = connections
            .writer
            .insert(self.connector.connect(ConnectionRole::Writer).await?);
        writer.ensure_schema().await?;
        ensure_seed(writer).await?;

        match request.route()? {
            Route::InsertUser => {
                let new_user = request.new_user()?;
                let user = writer.insert_user(&new_user).await?;
                tracing::info!(id = user.id, "User inserted");
                Ok(ResponseBody::inserted(user))
            }
            Route::ListUsers => {
                let reader = connections
                    .reader
                    .insert(self.connector.connect(ConnectionRole::Reader).await?);
                let users = reader.list_users().await?;
                tracing::info!(count = users.len(), "Users listed");
                Ok(ResponseBody::listed(users))
            }
        }
    }
}

/// Inserts the seed rows, in order, when the table is empty. Returns whether
/// it did.
///
/// Count and inserts are separate statements, so two invocations starting on
/// an empty table can both seed.
pub async fn ensure_seed<S: UserStore>(store: &mut S) -> Result<bool> {
    if store.count_users().await? != 0 {
        return Ok(false);
    }

    for user in seed_users() {
        store.insert_user(&user).await?;
    }
    tracing::info!("Seed users inserted");
    Ok(true)
}

/// Connections opened during one invocation.
struct Connections<S: UserStore> {
    writer: Option<S>,
    reader: Option<S>,
}

impl<S: UserStore> Connections<S> {
    fn new() -> Self {
        Self {
            writer: None,
            reader: None,
        }
    }

    /// Closes the writer, then the reader. Close failures are only logged.
    async fn release(self) {
        for (role, store) in [
            (ConnectionRole::Writer, self.writer),
            (ConnectionRole::Reader, self.reader),
        ] {
            if let Some(store) = store {
                if let Err(e) = store.close().await {
                    tracing::warn!(%role, error = %e, "Failed to close connection");
                }
            }
        }
    }
}
