use crate::config::HandlerConfig;
use crate::domain::model::{NewUser, User};
use crate::domain::ports::{ConnectionRole, Connector, UserStore};
use crate::utils::error::Result;
use sqlx::{Connection, PgConnection};

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
      id SERIAL PRIMARY KEY,
      name VARCHAR(100) NOT NULL,
      email VARCHAR(100) UNIQUE NOT NULL,
      created_at TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Opens one dedicated connection per role. Nothing is pooled or reused
/// across invocations.
#[derive(Debug, Clone)]
pub struct PgConnector {
    config: HandlerConfig,
}

impl PgConnector {
    pub fn new(config: HandlerConfig) -> Self {
        Self { config }
    }
}

impl Connector for PgConnector {
    type Store = PgUserStore;

    async fn connect(&self, role: ConnectionRole) -> Result<PgUserStore> {
        let db = self.config.for_role(role);
        tracing::debug!(%role, host = %db.host, "Opening database connection");
        let conn = PgConnection::connect_with(&db.connect_options()).await?;
        Ok(PgUserStore { conn, role })
    }
}

pub struct PgUserStore {
    conn: PgConnection,
    role: ConnectionRole,
}

impl UserStore for PgUserStore {
    async fn ensure_schema(&mut self) -> Result<()> {
        sqlx::query(CREATE_USERS_TABLE)
            .execute(&mut self.conn)
            .await?;
        Ok(())
    }

    async fn count_users(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut self.conn)
            .await?;
        Ok(count)
    }

    async fn insert_user(&mut self, user: &NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING *",
        )
        .bind(user.name.as_deref())
        .bind(user.email.as_deref())
        .fetch_one(&mut self.conn)
        .await?;
        Ok(row)
    }

    async fn list_users(&mut self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users")
            .fetch_all(&mut self.conn)
            .await?;
        Ok(rows)
    }

    async fn close(self) -> Result<()> {
        tracing::debug!(role = %self.role, "Closing database connection");
        self.conn.close().await?;
        Ok(())
    }
}
