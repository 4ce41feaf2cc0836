use axum::{extract::FromRequestParts, http::request::Parts};
use common::Role;
use sea_orm::EntityTrait;

use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. The user row is
/// re-fetched on every request, so a deactivated account or a changed role
/// takes effect immediately even for tokens signed before the change.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

/// Explicit allow-list check used by every role-gated handler.
pub fn require_role(role: Role, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        let names: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
        Err(AppError::PermissionDenied(format!(
            "Requires one of roles: {}",
            names.join(", ")
        )))
    }
}

impl AuthUser {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    /// Mentors and managers may review submissions and inspect any student.
    pub fn require_reviewer(&self) -> Result<(), AppError> {
        require_role(self.role, &[Role::Mentor, Role::Manager])
    }

    /// Managers only: account administration.
    pub fn require_manager(&self) -> Result<(), AppError> {
        require_role(self.role, &[Role::Manager])
    }

    pub fn require_student(&self) -> Result<(), AppError> {
        require_role(self.role, &[Role::Student])
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims =
            jwt::verify(token, &state.config.auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;

        let user = user::Entity::find_by_id(claims.uid)
            .one(&state.db)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        if !user.is_active {
            return Err(AppError::AccountInactive);
        }

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_role_is_an_allow_list() {
        assert!(require_role(Role::Manager, &[Role::Mentor, Role::Manager]).is_ok());
        assert!(require_role(Role::Mentor, &[Role::Mentor, Role::Manager]).is_ok());
        assert!(matches!(
            require_role(Role::Student, &[Role::Mentor, Role::Manager]),
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(
            require_role(Role::Mentor, &[Role::Manager]),
            Err(AppError::PermissionDenied(_))
        ));
    }
}
