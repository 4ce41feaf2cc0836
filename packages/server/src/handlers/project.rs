use std::path::PathBuf;
use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::*;
use tokio::process::Command;
use tracing::instrument;

use crate::entity::{project, project_progress, project_step, step_question};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::project::{
    ProjectDto, ProjectResponse, ProjectsResponse, RunProjectResponse, StepDto, StepsResponse,
};
use crate::state::AppState;

async fn own_progress(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
    project_id: i32,
) -> Result<Option<project_progress::Model>, AppError> {
    if !auth_user.is_student() {
        return Ok(None);
    }
    let progress = project_progress::Entity::find()
        .filter(project_progress::Column::StudentId.eq(auth_user.user_id))
        .filter(project_progress::Column::ProjectId.eq(project_id))
        .one(db)
        .await?;
    Ok(progress)
}

/// List active projects. Students see their own progress attached.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_projects(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProjectsResponse>, AppError> {
    let projects = project::Entity::find()
        .filter(project::Column::IsActive.eq(true))
        .order_by_asc(project::Column::Id)
        .all(&state.db)
        .await?;

    let mut out = Vec::with_capacity(projects.len());
    for p in projects {
        let progress = own_progress(&state.db, &auth_user, p.id).await?;
        out.push(ProjectDto::new(p, progress));
    }

    Ok(Json(ProjectsResponse {
        success: true,
        projects: out,
    }))
}

/// Single project by id, with the calling student's progress if any.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, project_id))]
pub async fn get_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<i32>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = project::Entity::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".into()))?;

    let progress = own_progress(&state.db, &auth_user, project.id).await?;

    Ok(Json(ProjectResponse {
        success: true,
        project: ProjectDto::new(project, progress),
    }))
}

/// Execute a project's `index.py` under a wall-clock limit and return its
/// stdout together with the script source.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, project_id))]
pub async fn run_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<i32>,
) -> Result<Json<RunProjectResponse>, AppError> {
    auth_user.require_student()?;

    let project = project::Entity::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".into()))?;

    let rel = project
        .project_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::NotFound("Project path".into()))?;

    let project_dir = PathBuf::from(&state.config.projects.dir).join(rel);
    let script = project_dir.join("index.py");
    let code = tokio::fs::read_to_string(&script)
        .await
        .map_err(|_| AppError::NotFound("Project script".into()))?;

    let limit = Duration::from_secs(state.config.projects.run_timeout_secs);
    let run = tokio::time::timeout(
        limit,
        Command::new("python3")
            .arg("index.py")
            .current_dir(&project_dir)
            // Reap the child when the timeout drops the future.
            .kill_on_drop(true)
            .output(),
    )
    .await;

    let output = match run {
        Ok(result) => {
            result.map_err(|e| AppError::Internal(format!("Failed to run script: {e}")))?
        }
        Err(_) => return Err(AppError::Validation("Code execution timed out".into())),
    };

    if !output.status.success() {
        return Err(AppError::Validation(
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ));
    }

    Ok(Json(RunProjectResponse {
        success: true,
        output: String::from_utf8_lossy(&output.stdout).into_owned(),
        code,
    }))
}

/// Released steps of a project, in order, each with its questions.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, project_id))]
pub async fn list_steps(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<i32>,
) -> Result<Json<StepsResponse>, AppError> {
    auth_user.require_student()?;

    let steps = project_step::Entity::find()
        .filter(project_step::Column::ProjectId.eq(project_id))
        .filter(project_step::Column::IsReleased.eq(true))
        .order_by_asc(project_step::Column::OrderIndex)
        .all(&state.db)
        .await?;

    let mut out = Vec::with_capacity(steps.len());
    for step in steps {
        let questions = step_question::Entity::find()
            .filter(step_question::Column::StepId.eq(step.id))
            .order_by_asc(step_question::Column::Id)
            .all(&state.db)
            .await?;
        out.push(StepDto::new(step, questions));
    }

    Ok(Json(StepsResponse {
        success: true,
        steps: out,
    }))
}
