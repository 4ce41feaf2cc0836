use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Error type shared by every handler. Each variant maps onto exactly one
/// HTTP status and a stable machine-readable code.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or semantically invalid request body / parameters.
    Validation(String),
    /// No bearer token on a protected route.
    TokenMissing,
    /// Token failed signature or expiry checks, or its user no longer exists.
    TokenInvalid,
    /// Login with a bad username/password pair.
    InvalidCredentials,
    /// The account exists but has been deactivated.
    AccountInactive,
    /// Authenticated, but the caller's role does not allow this operation.
    PermissionDenied(String),
    NotFound(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    code: &'static str,
    error: String,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg.clone()),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "token_missing",
                "Authentication token is missing".into(),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "token_invalid",
                "Authentication token is invalid or expired".into(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password".into(),
            ),
            AppError::AccountInactive => (
                StatusCode::FORBIDDEN,
                "account_inactive",
                "This account has been deactivated".into(),
            ),
            AppError::PermissionDenied(msg) => {
                (StatusCode::FORBIDDEN, "permission_denied", msg.clone())
            }
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{what} not found"),
            ),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(%error, "internal error");
        }

        let body = ErrorBody {
            success: false,
            code,
            error,
        };
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { actual, limit } => AppError::Validation(format!(
                "Upload of {actual} bytes exceeds the {limit} byte limit"
            )),
            StorageError::NotFound(name) => AppError::NotFound(format!("File {name}")),
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_variants() {
        assert_eq!(
            AppError::Validation("x".into()).parts().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::TokenMissing.parts().0, StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::AccountInactive.parts().0, StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound("Project".into()).parts().0,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn storage_size_limit_maps_to_validation() {
        let err: AppError = StorageError::SizeLimitExceeded {
            actual: 10,
            limit: 5,
        }
        .into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
