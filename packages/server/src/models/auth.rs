use chrono::{DateTime, Utc};
use common::Role;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::validate_required;

/// User payload as serialized to clients. Never carries the password hash.
#[derive(Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub gender: Option<String>,
    pub batch: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::user::Model> for UserDto {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            gender: user.gender,
            batch: user.batch,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Request body for user registration. Registration always creates a student.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    /// Defaults to `{username}@no-email.local` when absent.
    pub email: Option<String>,
    pub gender: Option<String>,
    pub batch: Option<String>,
}

impl RegisterRequest {
    /// Email to store, falling back to a per-username placeholder.
    pub fn effective_email(&self) -> String {
        match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => email.to_string(),
            _ => format!("{}@no-email.local", self.username.trim()),
        }
    }
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 80 {
        return Err(AppError::Validation(
            "Username must be 1-80 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, and underscores".into(),
        ));
    }
    if payload.password.len() < 4 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 4-128 characters".into(),
        ));
    }
    validate_required(&payload.full_name, "full_name")?;
    Ok(())
}

/// Request body for user login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }
    Ok(())
}

/// Response for both successful registration and login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    /// JWT bearer token.
    pub token: String,
    pub user: UserDto,
}

/// Current authenticated user's profile.
#[derive(Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserDto,
}

/// Active students, for mentor/manager dashboards.
#[derive(Serialize)]
pub struct StudentsResponse {
    pub success: bool,
    pub students: Vec<UserDto>,
}

/// Request body for a manager resetting a student's password.
#[derive(Deserialize, Default)]
pub struct ResetPasswordRequest {
    /// Explicit new password; mutually optional with `generate`.
    pub password: Option<String>,
    /// When true and no password given, mint a random temporary password.
    #[serde(default)]
    pub generate: bool,
}

#[derive(Serialize)]
pub struct ResetPasswordResponse {
    pub success: bool,
    pub message: String,
    pub student: UserDto,
    /// Only present when the password was generated server-side; this is the
    /// single time it is ever disclosed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}
