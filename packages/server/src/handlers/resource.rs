use std::collections::{HashMap, HashSet};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{resource, user};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::resource::{
    CreateResourceRequest, ResourceDto, ResourceResponse, ResourcesResponse,
    validate_create_resource,
};
use crate::state::AppState;

async fn creator_names<C: ConnectionTrait>(
    db: &C,
    rows: &[resource::Model],
) -> Result<HashMap<i32, String>, AppError> {
    let ids: HashSet<i32> = rows.iter().map(|r| r.created_by).collect();
    let names = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.full_name))
        .collect();
    Ok(names)
}

/// Active resources, newest first.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_resources(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ResourcesResponse>, AppError> {
    let rows = resource::Entity::find()
        .filter(resource::Column::IsActive.eq(true))
        .order_by_desc(resource::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let names = creator_names(&state.db, &rows).await?;
    let resources = rows
        .into_iter()
        .map(|r| {
            let creator = names.get(&r.created_by).cloned();
            ResourceDto::new(r, creator)
        })
        .collect();

    Ok(Json(ResourcesResponse {
        success: true,
        resources,
    }))
}

/// Mentor/manager posts a new resource.
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(payload): AppJson<CreateResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_reviewer()?;
    validate_create_resource(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let row = resource::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        description: Set(payload.description),
        category: Set(Some(
            payload.category.unwrap_or_else(|| "General".to_string()),
        )),
        created_by: Set(auth_user.user_id),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    let creator = Some(auth_user.full_name.clone());
    Ok((
        StatusCode::CREATED,
        Json(ResourceResponse {
            success: true,
            resource: ResourceDto::new(row, creator),
        }),
    ))
}

/// Single resource; inactive ones are indistinguishable from missing.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, resource_id))]
pub async fn get_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(resource_id): Path<i32>,
) -> Result<Json<ResourceResponse>, AppError> {
    let row = resource::Entity::find_by_id(resource_id)
        .one(&state.db)
        .await?
        .filter(|r| r.is_active)
        .ok_or_else(|| AppError::NotFound("Resource".into()))?;

    let creator = user::Entity::find_by_id(row.created_by)
        .one(&state.db)
        .await?
        .map(|u| u.full_name);

    Ok(Json(ResourceResponse {
        success: true,
        resource: ResourceDto::new(row, creator),
    }))
}
