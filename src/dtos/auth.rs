use serde::{Deserialize, Serialize};

/// Login payload. Missing fields are treated as failed credentials, not as a
/// malformed body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

impl AuthResponse {
    pub fn ok(message: &str) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failed(message: &str) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
