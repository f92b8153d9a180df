//! Types for authentication and user management

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// User data as returned by the storefront API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    pub id: String,

    /// The user's email address
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// The creation time
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,

    /// Whether the account is active
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl User {
    /// "First Last", trimmed when either part is empty
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Credentials for `POST /api/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token
    pub access_token: String,

    /// The token type, normally `bearer`
    #[serde(default)]
    pub token_type: Option<String>,

    /// The signed-in user
    pub user: User,
}

/// Fields for `POST /api/auth/register`
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterRequest {
    pub fn new(email: &str, password: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}
