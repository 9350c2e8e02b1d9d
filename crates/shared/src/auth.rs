//! Auth token claims and request/response payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in the auth token cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Active organization ID.
    pub org: Uuid,
    /// User email.
    pub email: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Signup request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// User email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Optional company name for the first organization.
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Login request payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Authenticated user returned by auth endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Active organization ID.
    pub organization_id: Uuid,
}
