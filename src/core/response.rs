use crate::domain::model::User;
use crate::utils::error::HandlerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const INSERT_MESSAGE: &str = "User inserted successfully";

/// Response envelope returned to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: String,
    pub body: String,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Inserted { message: &'static str, user: User },
    Listed { users: Vec<User> },
}

impl ResponseBody {
    pub fn inserted(user: User) -> Self {
        ResponseBody::Inserted {
            message: INSERT_MESSAGE,
            user,
        }
    }

    pub fn listed(users: Vec<User>) -> Self {
        ResponseBody::Listed { users }
    }
}

impl ApiResponse {
    pub fn ok(body: &ResponseBody) -> Self {
        match serde_json::to_string(body) {
            Ok(json) => Self::with_status("200", json),
            Err(e) => Self::error(&HandlerError::from(e)),
        }
    }

    /// The body is the error message encoded as a JSON string.
    pub fn error(err: &HandlerError) -> Self {
        let message = err.to_string();
        let json = serde_json::to_string(&message).unwrap_or_else(|_| "\"\"".to_string());
        Self::with_status("400", json)
    }

    pub fn is_success(&self) -> bool {
        self.status_code == "200"
    }

    fn with_status(status_code: &str, body: String) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code: status_code.to_string(),
            body,
            headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn ann() -> User {
        User {
            id: 4,
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_insert_envelope() {
        let response = ApiResponse::ok(&ResponseBody::inserted(ann()));

        assert_eq!(response.status_code, "200");
        assert_eq!(response.headers["Content-Type"], "application/json");
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(
            body,
            json!({
                "message": "User inserted successfully",
                "user": { "id": 4, "name": "Ann", "email": "ann@x.com", "created_at": null }
            })
        );
    }

    #[test]
    fn test_list_envelope() {
        let response = ApiResponse::ok(&ResponseBody::listed(vec![ann()]));
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["users"][0]["email"], "ann@x.com");
    }

    #[test]
    fn test_error_body_is_a_json_string() {
        let err = HandlerError::UnsupportedPath {
            path: "/delete".to_string(),
            method: "POST".to_string(),
        };
        let response = ApiResponse::error(&err);

        assert_eq!(response.status_code, "400");
        assert!(!response.is_success());
        assert_eq!(response.body, "\"Unsupported path \\\"/delete\\\" for POST method\"");
        let decoded: String = serde_json::from_str(&response.body).unwrap();
        assert_eq!(decoded, "Unsupported path \"/delete\" for POST method");
    }

    #[test]
    fn test_envelope_field_names() {
        let response = ApiResponse::error(&HandlerError::MissingBody);
        let envelope = serde_json::to_value(&response).unwrap();
        assert_eq!(envelope["statusCode"], "400");
        assert_eq!(envelope["headers"]["Content-Type"], "application/json");
        assert!(envelope["body"].is_string());
    }
}
