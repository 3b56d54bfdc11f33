//! Wire DTOs for the auth endpoints.
//!
//! DESIGN
//! ======
//! Field names follow the backend's JSON (`createdAt`), and numeric user IDs
//! are folded into strings so the cached user record has one shape no matter
//! which backend build produced it.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// The authenticated account as reported by the server and cached locally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` success body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// `POST /api/auth/register` success body. The backend may or may not issue a
/// token here; either way it is not persisted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SignupPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// `GET /api/auth/profile` success body. `token` is present when the server
/// slid the session expiry forward.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProfilePayload {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
}

/// `POST /api/auth/refresh` success body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RefreshPayload {
    pub token: String,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, got {other}"))),
    }
}
