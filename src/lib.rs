pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{MemoryConnector, PgConnector};
pub use config::{DbConfig, HandlerConfig};
pub use self::core::{handler::UserHandler, request::ApiRequest, response::ApiResponse};
pub use utils::error::{HandlerError, Result};
