//! Admin session models.

use serde::{Deserialize, Serialize};

/// Request body for admin login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A server-side admin session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    #[serde(skip_serializing)]
    pub token: String,
    pub email: String,
    pub created_at: String,
    pub expires_at: String,
}

/// Response body for a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub expires_at: String,
}
