use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::Role;
use rand::Rng;
use rand::distr::Alphanumeric;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AuthResponse, LoginRequest, MeResponse, RegisterRequest, ResetPasswordRequest,
    ResetPasswordResponse, StudentsResponse, UserDto, validate_login_request,
    validate_register_request,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

fn sign_token(state: &AppState, user: &user::Model) -> Result<String, AppError> {
    jwt::sign(
        user.id,
        &user.username,
        user.role.as_str(),
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_days,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))
}

/// Handle user registration. Every self-registered account is a student.
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let username = payload.username.trim().to_string();
    let email = payload.effective_email();

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let txn = state.db.begin().await?;

    let username_taken = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&txn)
        .await?
        .is_some();
    if username_taken {
        return Err(AppError::Validation("Username already exists".into()));
    }
    let email_taken = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&txn)
        .await?
        .is_some();
    if email_taken {
        return Err(AppError::Validation("Email already exists".into()));
    }

    let new_user = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password: Set(hash),
        full_name: Set(payload.full_name.trim().to_string()),
        gender: Set(payload.gender.clone()),
        batch: Set(payload.batch.clone()),
        role: Set(Role::Student),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    // Unique indexes still back this up if two registrations race.
    let user = new_user.insert(&txn).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Validation("Username or email already exists".into())
        }
        _ => AppError::from(e),
    })?;

    txn.commit().await?;

    let token = sign_token(&state, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered".into(),
            token,
            user: UserDto::from(user),
        }),
    ))
}

/// Handle user login.
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_login_request(&payload)?;

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.trim()))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !hash::verify_password(&payload.password, &user.password) {
        return Err(AppError::InvalidCredentials);
    }
    if !user.is_active {
        return Err(AppError::AccountInactive);
    }

    let token = sign_token(&state, &user)?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".into(),
        token,
        user: UserDto::from(user),
    }))
}

/// Return the current authenticated user's info.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::TokenInvalid)?;

    Ok(Json(MeResponse {
        success: true,
        user: UserDto::from(user),
    }))
}

/// List all active students, for mentor/manager dashboards.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudentsResponse>, AppError> {
    auth_user.require_reviewer()?;

    let students = user::Entity::find()
        .filter(user::Column::Role.eq(Role::Student))
        .filter(user::Column::IsActive.eq(true))
        .order_by_asc(user::Column::FullName)
        .all(&state.db)
        .await?;

    Ok(Json(StudentsResponse {
        success: true,
        students: students.into_iter().map(UserDto::from).collect(),
    }))
}

fn generate_temp_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect()
}

/// Manager resets a student's password, either to an explicit value or to a
/// freshly generated temporary one.
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, student_id))]
pub async fn reset_student_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(student_id): Path<i32>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, AppError> {
    auth_user.require_manager()?;

    let txn = state.db.begin().await?;

    let student = user::Entity::find_by_id(student_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Student".into()))?;

    if student.role != Role::Student {
        return Err(AppError::Validation("Target user must be a student".into()));
    }

    let generated = payload.generate && payload.password.is_none();
    let new_password = match payload.password {
        Some(password) => password,
        None if payload.generate => generate_temp_password(),
        None => {
            return Err(AppError::Validation(
                "Provide a password or set generate to true".into(),
            ));
        }
    };

    if new_password.len() < 4 {
        return Err(AppError::Validation(
            "password must be at least 4 characters".into(),
        ));
    }

    let hash = hash::hash_password(&new_password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let mut active: user::ActiveModel = student.into();
    active.password = Set(hash);
    let student = active.update(&txn).await?;

    txn.commit().await?;

    Ok(Json(ResetPasswordResponse {
        success: true,
        message: "Password reset".into(),
        student: UserDto::from(student),
        temporary_password: generated.then_some(new_password),
    }))
}
