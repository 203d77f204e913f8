use crate::domain::model::NewUser;
use crate::utils::error::{HandlerError, Result};
use serde_json::Value;

/// Canonical request, independent of which gateway shape delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Option<String>,
    pub path: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    InsertUser,
    ListUsers,
}

impl ApiRequest {
    /// Accepts both the REST API (`httpMethod`, `path`) and the HTTP API
    /// (`requestContext.http.method`, `rawPath`) shapes. Empty strings count
    /// as absent. Anything unreadable is treated as missing, never as an error.
    pub fn from_event(event: &Value) -> Self {
        let method = string_at(event, "/httpMethod")
            .or_else(|| string_at(event, "/requestContext/http/method"));
        let path = string_at(event, "/path")
            .or_else(|| string_at(event, "/rawPath"))
            .unwrap_or_else(|| "/".to_string());
        let body = event
            .get("body")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self { method, path, body }
    }

    pub fn route(&self) -> Result<Route> {
        match self.method.as_deref() {
            Some("POST") => match self.path.as_str() {
                "/insert" => Ok(Route::InsertUser),
                _ => Err(self.unsupported_path("POST")),
            },
            Some("GET") => match self.path.as_str() {
                "/users" => Ok(Route::ListUsers),
                _ => Err(self.unsupported_path("GET")),
            },
            _ => Err(HandlerError::UnsupportedMethod {
                method: self.method.clone(),
            }),
        }
    }

    pub fn new_user(&self) -> Result<NewUser> {
        let body = self.body.as_deref().ok_or(HandlerError::MissingBody)?;
        Ok(serde_json::from_str(body)?)
    }

    fn unsupported_path(&self, method: &str) -> HandlerError {
        HandlerError::UnsupportedPath {
            path: self.path.clone(),
            method: method.to_string(),
        }
    }
}

fn string_at(event: &Value, pointer: &str) -> Option<String> {
    event
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
