//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{admin::Admin, user::User};

// ============================================================================
// Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub phone: String,
    pub password: String,
    /// Optional; defaults to "User <last 4 digits>"
    pub name: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Admin registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    /// Operator-issued invite code; registration is closed without it
    pub invite_code: Option<String>,
}

/// Admin login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Successful register/login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse<T> {
    pub user: T,
    pub token: String,
}

/// User record minus the password digest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    pub games_played: i32,
    pub vouchers: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: *user.user_id.as_uuid(),
            phone: user.phone.as_str().to_string(),
            name: user.name.clone(),
            games_played: user.games_played,
            vouchers: user.vouchers,
            created_at: user.created_at,
        }
    }
}

/// Admin record minus the password digest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Admin> for AdminView {
    fn from(admin: &Admin) -> Self {
        Self {
            id: *admin.admin_id.as_uuid(),
            email: admin.email.as_str().to_string(),
            name: admin.name.clone(),
            role: admin.role.code().to_string(),
            created_at: admin.created_at,
        }
    }
}
