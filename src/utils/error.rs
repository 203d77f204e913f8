use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Unsupported method \"{}\"", .method.as_deref().unwrap_or("undefined"))]
    UnsupportedMethod { method: Option<String> },

    #[error("Unsupported path \"{path}\" for {method} method")]
    UnsupportedPath { path: String, method: String },

    #[error("Request body is required")]
    MissingBody,

    #[error("{0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("{}", database_message(.0))]
    Database(#[from] sqlx::Error),

    #[error("{message}")]
    Store { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse grouping used when logging failures. Responses never expose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Routing,
    Input,
    Store,
    Config,
}

impl HandlerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HandlerError::UnsupportedMethod { .. } | HandlerError::UnsupportedPath { .. } => {
                ErrorCategory::Routing
            }
            HandlerError::MissingBody | HandlerError::InvalidBody(_) => ErrorCategory::Input,
            HandlerError::Database(_) | HandlerError::Store { .. } => ErrorCategory::Store,
            HandlerError::IoError(_)
            | HandlerError::MissingConfigError { .. }
            | HandlerError::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    pub(crate) fn store(message: impl Into<String>) -> Self {
        HandlerError::Store {
            message: message.into(),
        }
    }
}

/// Server-reported errors carry only the server's own message, without the
/// sqlx wrapper text.
fn database_message(err: &sqlx::Error) -> String {
    match err.as_database_error() {
        Some(db) => db.message().to_string(),
        None => err.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, HandlerError>;
