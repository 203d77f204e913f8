use crate::utils::error::Result;
use clap::Parser;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "users-lambda")]
#[command(about = "Invoke the users handler locally with a single event")]
pub struct CliConfig {
    #[arg(long, help = "Read the whole invocation event from a JSON file")]
    pub event: Option<PathBuf>,

    #[arg(long, short = 'X', conflicts_with = "event")]
    pub method: Option<String>,

    #[arg(long, conflicts_with = "event")]
    pub path: Option<String>,

    #[arg(long, help = "Request body (a JSON string)", conflicts_with = "event")]
    pub body: Option<String>,

    #[arg(long, help = "Run against an in-memory table instead of Postgres")]
    pub memory: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Builds the invocation event, either from `--event` or from the
    /// individual request flags.
    pub fn load_event(&self) -> Result<Value> {
        if let Some(path) = &self.event {
            let raw = fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&raw)?);
        }

        let mut event = Map::new();
        if let Some(method) = &self.method {
            event.insert("httpMethod".to_string(), Value::String(method.to_uppercase()));
        }
        if let Some(path) = &self.path {
            event.insert("path".to_string(), Value::String(path.clone()));
        }
        if let Some(body) = &self.body {
            event.insert("body".to_string(), Value::String(body.clone()));
        }
        Ok(Value::Object(event))
    }
}
