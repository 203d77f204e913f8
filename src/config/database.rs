use crate::domain::ports::ConnectionRole;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_port, validate_required_field, Validate,
};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    /// Encrypted transport without server-certificate verification.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(PgSslMode::Require)
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl Validate for DbConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("host", &self.host)?;
        validate_non_empty_string("database", &self.database)?;
        validate_non_empty_string("user", &self.user)?;
        Ok(())
    }
}

/// Connection settings for both roles. The reader shares everything with the
/// writer except the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub writer: DbConfig,
    pub reader: DbConfig,
}

impl HandlerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("DB_HOST");
        let port = lookup("DB_PORT");
        let database = lookup("DB_NAME");
        let user = lookup("DB_USER");
        let password = lookup("DB_PASSWORD");
        let read_host = lookup("DB_HOST_READ");

        let writer = DbConfig {
            host: validate_required_field("DB_HOST", &host)?.clone(),
            port: validate_port("DB_PORT", validate_required_field("DB_PORT", &port)?)?,
            database: validate_required_field("DB_NAME", &database)?.clone(),
            user: validate_required_field("DB_USER", &user)?.clone(),
            password: validate_required_field("DB_PASSWORD", &password)?.clone(),
        };
        let reader = DbConfig {
            host: validate_required_field("DB_HOST_READ", &read_host)?.clone(),
            ..writer.clone()
        };

        let config = Self { writer, reader };
        config.validate()?;
        Ok(config)
    }

    pub fn for_role(&self, role: ConnectionRole) -> &DbConfig {
        match role {
            ConnectionRole::Writer => &self.writer,
            ConnectionRole::Reader => &self.reader,
        }
    }
}

impl Validate for HandlerConfig {
    fn validate(&self) -> Result<()> {
        self.writer.validate()?;
        self.reader.validate()?;
        tracing::debug!(
            writer = %self.writer.host,
            reader = %self.reader.host,
            "Database configuration validation passed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::HandlerError;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        vars(&[
            ("DB_HOST", "primary.db.internal"),
            ("DB_HOST_READ", "replica.db.internal"),
            ("DB_PORT", "5432"),
            ("DB_NAME", "app"),
            ("DB_USER", "app_user"),
            ("DB_PASSWORD", "s3cret"),
        ])
    }

    #[test]
    fn test_from_lookup_builds_both_roles() {
        let env = full_env();
        let config = HandlerConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.writer.host, "primary.db.internal");
        assert_eq!(config.reader.host, "replica.db.internal");
        assert_eq!(config.reader.port, 5432);
        assert_eq!(config.reader.database, "app");
        assert_eq!(config.reader.user, "app_user");
        assert_eq!(config.reader.password, "s3cret");
        assert_eq!(config.for_role(ConnectionRole::Reader).host, "replica.db.internal");
    }

    #[test]
    fn test_missing_variable_fails_fast() {
        let mut env = full_env();
        env.remove("DB_HOST_READ");

        let err = HandlerConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, HandlerError::MissingConfigError { ref field } if field == "DB_HOST_READ"));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut env = full_env();
        env.insert("DB_PORT".to_string(), "not-a-port".to_string());

        let err = HandlerConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidConfigValueError { ref field, .. } if field == "DB_PORT"));
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let mut env = full_env();
        env.insert("DB_HOST".to_string(), " ".to_string());

        assert!(HandlerConfig::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let env = full_env();
        let config = HandlerConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("primary.db.internal"));
    }
}
